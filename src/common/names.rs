use once_cell::sync::Lazy;
use regex::Regex;

static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Check that a string is a valid Avro simple name.
pub fn is_valid_name(name: &str) -> bool {
    NAME_RE.is_match(name)
}

/// Check that a string is a valid Avro namespace: dot-separated simple names.
/// The empty namespace is valid.
pub fn is_valid_namespace(namespace: &str) -> bool {
    namespace.is_empty() || namespace.split('.').all(is_valid_name)
}

/// Join a name and an optional namespace into an Avro fullname.
pub fn fullname(name: &str, namespace: Option<&str>) -> String {
    match namespace {
        Some(ns) if !ns.is_empty() => format!("{ns}.{name}"),
        _ => name.to_string(),
    }
}

/// Split a possibly dotted name into `(name, namespace)`.
///
/// A dotted name carries its own namespace; otherwise the `fallback`
/// namespace applies. Empty namespaces are normalized to `None`.
pub fn split_fullname(name: &str, fallback: Option<&str>) -> (String, Option<String>) {
    match name.rsplit_once('.') {
        Some((ns, short)) => (short.to_string(), Some(ns.to_string()).filter(|s| !s.is_empty())),
        None => (
            name.to_string(),
            fallback.filter(|ns| !ns.is_empty()).map(str::to_string),
        ),
    }
}

/// Directory name for a topic: the topic with leading and trailing `/` removed.
pub fn topic_dir(topic: &str) -> &str {
    topic.trim_matches('/')
}

/// File stem `<namespace>.<name>` used for exported schema and sample files.
pub fn schema_file_stem(name: &str, namespace: Option<&str>) -> String {
    fullname(name, namespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_names_and_namespaces() {
        assert!(is_valid_name("Order_2"));
        assert!(is_valid_name("_private"));
        assert!(!is_valid_name("2fast"));
        assert!(!is_valid_name("with-dash"));
        assert!(is_valid_namespace(""));
        assert!(is_valid_namespace("com.acme.orders"));
        assert!(!is_valid_namespace("com..acme"));
    }

    #[test]
    fn splits_dotted_names() {
        assert_eq!(
            split_fullname("com.acme.Order", Some("other")),
            ("Order".to_string(), Some("com.acme".to_string()))
        );
        assert_eq!(
            split_fullname("Order", Some("com.acme")),
            ("Order".to_string(), Some("com.acme".to_string()))
        );
        assert_eq!(split_fullname("Order", Some("")), ("Order".to_string(), None));
    }

    #[test]
    fn trims_topic_slashes() {
        assert_eq!(topic_dir("/orders/new/"), "orders/new");
        assert_eq!(topic_dir("orders"), "orders");
        assert_eq!(fullname("Order", None), "Order");
        assert_eq!(schema_file_stem("Order", Some("com.acme")), "com.acme.Order");
    }
}
