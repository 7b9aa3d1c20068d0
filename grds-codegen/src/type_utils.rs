use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Target type for columns whose type is not known to the mapping.
pub const FALLBACK_TYPE: &str = "interface{}";

const DEFAULT_TYPE_MAPPING: &[(&str, &str)] = &[
    // integers
    ("tinyint", "int8"),
    ("smallint", "int16"),
    ("mediumint", "int"),
    ("int", "int"),
    ("integer", "int"),
    ("bigint", "int64"),
    // unsigned integers
    ("tinyint unsigned", "uint8"),
    ("smallint unsigned", "uint16"),
    ("mediumint unsigned", "uint32"),
    ("int unsigned", "uint32"),
    ("integer unsigned", "uint32"),
    ("bigint unsigned", "uint64"),
    // floating point
    ("float", "float32"),
    ("double", "float64"),
    ("decimal", "float64"),
    // strings
    ("char", "string"),
    ("varchar", "string"),
    ("tinytext", "string"),
    ("text", "string"),
    ("mediumtext", "string"),
    ("longtext", "string"),
    // temporal
    ("date", "time.Time"),
    ("datetime", "time.Time"),
    ("timestamp", "time.Time"),
    ("time", "string"),
    ("year", "int"),
    // binary
    ("tinyblob", "[]byte"),
    ("blob", "[]byte"),
    ("mediumblob", "[]byte"),
    ("longblob", "[]byte"),
    ("binary", "[]byte"),
    ("varbinary", "[]byte"),
    // other
    ("json", "string"),
    ("enum", "string"),
    ("set", "string"),
];

fn base_type_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\w+)").expect("static pattern"))
}

/// Maps MySQL column types to Go types.
///
/// Keys are lower-cased base type names, optionally followed by `" unsigned"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapping {
    entries: BTreeMap<String, String>,
}

impl Default for TypeMapping {
    fn default() -> Self {
        TypeMapping {
            entries: DEFAULT_TYPE_MAPPING
                .iter()
                .map(|(db, go)| (db.to_string(), go.to_string()))
                .collect(),
        }
    }
}

impl TypeMapping {
    /// A mapping with no entries at all; every lookup goes to the fallbacks.
    pub fn empty() -> Self {
        TypeMapping {
            entries: BTreeMap::new(),
        }
    }

    /// Layer `overrides` on top; later entries win on key collision.
    pub fn extend<I, K, V>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (db, go) in overrides {
            self.entries.insert(db.into().to_lowercase(), go.into());
        }
    }

    pub fn insert(&mut self, db_type: impl Into<String>, go_type: impl Into<String>) {
        self.extend([(db_type.into(), go_type.into())]);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a raw column type such as `int(11) unsigned` to a Go type.
    ///
    /// Never fails: unknown types map to [`FALLBACK_TYPE`].
    pub fn resolve(&self, db_type: &str) -> String {
        let lowered = db_type.to_lowercase();
        let unsigned = lowered.contains("unsigned");
        let base = base_type_pattern()
            .captures(&lowered)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .unwrap_or(lowered.as_str());

        if unsigned {
            if let Some(go) = self.get(&format!("{base} unsigned")) {
                return go.to_string();
            }
        }

        if let Some(go) = self.get(base) {
            return go.to_string();
        }

        if unsigned {
            if let Some(go) = unsigned_width(base) {
                return go.to_string();
            }
        }

        FALLBACK_TYPE.to_string()
    }
}

fn unsigned_width(base: &str) -> Option<&'static str> {
    match base {
        "tinyint" => Some("uint8"),
        "smallint" => Some("uint16"),
        "mediumint" | "int" | "integer" => Some("uint32"),
        "bigint" => Some("uint64"),
        _ => None,
    }
}

/// Convert a snake_case name to an upper camel case identifier.
/// e.g. "user_id" -> "UserId", "ORDER_items" -> "OrderItems"
///
/// Each underscore-separated segment gets its first character upper-cased and
/// the rest lower-cased. A name without underscores that already reads as an
/// upper camel case identifier ("UserId") is returned unchanged.
pub fn to_upper_camel(name: &str) -> String {
    if is_upper_camel(name) {
        return name.to_string();
    }
    name.split('_').map(capitalize_segment).collect()
}

/// Convert a snake_case name to lower camel case.
/// e.g. "user_id" -> "userId", "Created_AT" -> "createdAt"
pub fn to_lower_camel(name: &str) -> String {
    let mut parts = name.split('_');
    let mut out = parts.next().unwrap_or_default().to_lowercase();
    for part in parts {
        out.push_str(&capitalize_segment(part));
    }
    out
}

fn capitalize_segment(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => {
            let mut s: String = first.to_uppercase().collect();
            s.push_str(&chars.as_str().to_lowercase());
            s
        }
        None => String::new(),
    }
}

fn is_upper_camel(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && name.chars().all(|c| c.is_ascii_alphanumeric())
        && name.chars().any(|c| c.is_ascii_lowercase())
}

/// Whether `name` is usable as an exported Go identifier.
pub fn is_exported_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => chars.all(|c| c.is_alphanumeric() || c == '_'),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mapping() {
        let mapping = TypeMapping::default();
        for (db, go) in DEFAULT_TYPE_MAPPING {
            assert_eq!(&mapping.resolve(db), go, "type {db}");
        }
        assert_eq!(mapping.len(), DEFAULT_TYPE_MAPPING.len());
    }

    #[test]
    fn test_resolve_strips_length_and_case() {
        let mapping = TypeMapping::default();
        assert_eq!(mapping.resolve("INT(11)"), "int");
        assert_eq!(mapping.resolve("varchar(255)"), "string");
        assert_eq!(mapping.resolve("int(11) unsigned"), "uint32");
        assert_eq!(mapping.resolve("decimal(10,2)"), "float64");
        assert_eq!(mapping.resolve("enum('a','b')"), "string");
        assert_eq!(mapping.resolve("datetime(3)"), "time.Time");
    }

    #[test]
    fn test_override_wins_for_bare_and_unsigned() {
        let mut mapping = TypeMapping::default();
        mapping.extend([("decimal", "decimal.Decimal"), ("INT UNSIGNED", "uint")]);
        assert_eq!(mapping.resolve("decimal(10,2)"), "decimal.Decimal");
        assert_eq!(mapping.resolve("int(10) unsigned"), "uint");

        mapping.insert("bigint", "MyInt");
        assert_eq!(mapping.resolve("bigint(20)"), "MyInt");
    }

    #[test]
    fn test_bare_override_applies_to_unsigned_without_entry() {
        let mut mapping = TypeMapping::empty();
        mapping.insert("int", "int32");
        assert_eq!(mapping.resolve("int unsigned"), "int32");
    }

    #[test]
    fn test_unsigned_fallback_rule() {
        let mapping = TypeMapping::empty();
        assert_eq!(mapping.resolve("bigint unsigned"), "uint64");
        assert_eq!(mapping.resolve("tinyint(3) unsigned"), "uint8");
        assert_eq!(mapping.resolve("smallint unsigned"), "uint16");
        assert_eq!(mapping.resolve("mediumint unsigned"), "uint32");
        assert_eq!(mapping.resolve("integer unsigned"), "uint32");
        // Signed lookups have no fallback.
        assert_eq!(mapping.resolve("bigint"), FALLBACK_TYPE);
    }

    #[test]
    fn test_unknown_type_falls_back() {
        let mapping = TypeMapping::default();
        assert_eq!(mapping.resolve("geometry"), FALLBACK_TYPE);
        assert_eq!(mapping.resolve("point unsigned"), FALLBACK_TYPE);
        assert_eq!(mapping.resolve(""), FALLBACK_TYPE);
    }

    #[test]
    fn test_to_upper_camel() {
        assert_eq!(to_upper_camel("user_id"), "UserId");
        assert_eq!(to_upper_camel("users"), "Users");
        assert_eq!(to_upper_camel("ORDER_ITEMS"), "OrderItems");
        assert_eq!(to_upper_camel("a__b"), "AB");
        assert_eq!(to_upper_camel("_"), "");
        assert_eq!(to_upper_camel("userName"), "Username");
    }

    #[test]
    fn test_to_upper_camel_is_idempotent() {
        let once = to_upper_camel("user_profile_id");
        assert_eq!(once, "UserProfileId");
        assert_eq!(to_upper_camel(&once), once);
        assert_eq!(to_upper_camel("UserId"), "UserId");
    }

    #[test]
    fn test_to_lower_camel() {
        assert_eq!(to_lower_camel("user_id"), "userId");
        assert_eq!(to_lower_camel("Created_AT"), "createdAt");
        assert_eq!(to_lower_camel("name"), "name");
        assert_eq!(to_lower_camel("a__b"), "aB");
    }

    #[test]
    fn test_is_exported_identifier() {
        assert!(is_exported_identifier("Users"));
        assert!(is_exported_identifier("User2fa"));
        assert!(!is_exported_identifier(""));
        assert!(!is_exported_identifier("2faCodes"));
        assert!(!is_exported_identifier("Order-items"));
        assert!(!is_exported_identifier("users"));
    }
}
