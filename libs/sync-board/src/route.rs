pub const LANDING: &str = "/";
pub const CREATE: &str = "/create";

pub fn page(id: i64) -> String {
    format!("{}/{}", CREATE, id)
}

/// Parses the `{id}` segment of `/create/{id}`.
pub fn parse_page_id(segment: &str) -> Option<i64> {
    segment.trim().parse::<i64>().ok()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_page_route() {
        assert_eq!(page(42), "/create/42");
    }

    #[test]
    fn test_parse_page_id() {
        assert_eq!(parse_page_id("42"), Some(42));
        assert_eq!(parse_page_id("abc"), None);
        assert_eq!(parse_page_id(""), None);
        assert_eq!(parse_page_id("4.2"), None);
    }
}
