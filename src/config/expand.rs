//! `${name}` property references in build-file attributes.

use super::ConfigError;
use crate::props::PropertyStore;

/// Replace `${name}` with the store's value.
///
/// Unknown properties are left as written, `$$` emits a single `$`, and a lone
/// `$` is literal. Errors on `${` with no closing `}`.
pub fn expand<S: PropertyStore + ?Sized>(input: &str, store: &S) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if let Some(after) = tail.strip_prefix("$$") {
            out.push('$');
            rest = after;
        } else if let Some(body) = tail.strip_prefix("${") {
            let end = body
                .find('}')
                .ok_or_else(|| ConfigError::InvalidConfig(format!("unclosed ${{ in '{}'", input)))?;
            let name = &body[..end];
            match store.get(name) {
                Some(v) => out.push_str(&v),
                None => {
                    out.push_str("${");
                    out.push_str(name);
                    out.push('}');
                }
            }
            rest = &body[end + 1..];
        } else {
            out.push('$');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    Ok(out)
}
