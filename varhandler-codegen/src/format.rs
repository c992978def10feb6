//! Canonical formatting of generated source.

/// Reformat `source` the way `rustfmt` would lay it out.
///
/// Comments do not survive formatting, so banners must be added afterwards.
pub fn format_source(source: &str) -> Result<String, syn::Error> {
    let file = syn::parse_file(source)?;
    Ok(prettyplease::unparse(&file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats_valid_source() {
        let formatted = format_source("fn   f( x :u16 ){let y=x;}").unwrap();
        assert_eq!(formatted, "fn f(x: u16) {\n    let y = x;\n}\n");
    }

    #[test]
    fn test_formatting_is_stable() {
        let once = format_source("use a::b;fn f(){}").unwrap();
        let twice = format_source(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_invalid_source_is_rejected() {
        assert!(format_source("fn f( {").is_err());
    }
}
