use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{cmp::Ordering, fmt, str::FromStr};
use thiserror::Error as ThisError;

///
/// ObjectPathParseError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ObjectPathParseError {
    #[error("object path is empty")]
    Empty,

    #[error("host must be followed by '/namespace:'")]
    HostWithoutNamespace,

    #[error("invalid class name '{0}'")]
    InvalidClassName(String),

    #[error("invalid key name '{0}'")]
    InvalidKeyName(String),

    #[error("missing key bindings after '.'")]
    MissingKeys,

    #[error("duplicate key '{0}'")]
    DuplicateKey(String),

    #[error("unterminated string value for key '{0}'")]
    UnterminatedString(String),

    #[error("invalid escape '\\{0}'")]
    InvalidEscape(char),

    #[error("invalid value '{value}' for key '{key}'")]
    InvalidKeyValue { key: String, value: String },

    #[error("unexpected character '{0}' after key value")]
    TrailingCharacter(char),
}

///
/// KeyValue
///

#[derive(Clone, Debug, PartialEq)]
pub enum KeyValue {
    String(String),
    Boolean(bool),
    Integer(i128),
    Reference(Box<ObjectPath>),
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write_quoted(f, s),
            Self::Boolean(true) => f.write_str("TRUE"),
            Self::Boolean(false) => f.write_str("FALSE"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Reference(path) => write_quoted(f, &path.to_string()),
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for ch in s.chars() {
        if matches!(ch, '\\' | '"') {
            f.write_str("\\")?;
        }
        write!(f, "{ch}")?;
    }
    f.write_str("\"")
}

///
/// KeyBinding
///

#[derive(Clone, Debug)]
pub struct KeyBinding {
    pub name: String,
    pub value: KeyValue,
}

impl KeyBinding {
    #[must_use]
    pub fn new(name: impl Into<String>, value: KeyValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl PartialEq for KeyBinding {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name) && self.value == other.value
    }
}

///
/// ObjectPath
///
/// Reference to a single instance (or a class when no keys are bound):
///
///   //host/namespace:ClassName.key1="v",key2=5,key3=TRUE
///
/// Names compare ASCII case-insensitively; key values compare by type.
/// Key bindings are kept sorted by name.
///

#[derive(Clone, Debug)]
pub struct ObjectPath {
    host: Option<String>,
    namespace: Option<String>,
    class_name: String,
    keys: Vec<KeyBinding>,
}

impl ObjectPath {
    #[must_use]
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            host: None,
            namespace: None,
            class_name: class_name.into(),
            keys: Vec::new(),
        }
    }

    /// Set host and namespace together; the text form cannot carry a host
    /// without a namespace.
    pub fn with_location(
        mut self,
        host: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Result<Self, ObjectPathParseError> {
        let namespace = normalize_namespace(namespace.into())
            .ok_or(ObjectPathParseError::HostWithoutNamespace)?;
        self.host = Some(host.into());
        self.namespace = Some(namespace);

        Ok(self)
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.set_namespace(namespace);
        self
    }

    /// Bind a key, replacing any binding of the same name.
    #[must_use]
    pub fn with_key(mut self, name: impl Into<String>, value: KeyValue) -> Self {
        let binding = KeyBinding::new(name, value);
        self.keys
            .retain(|existing| !existing.name.eq_ignore_ascii_case(&binding.name));
        self.keys.push(binding);
        sort_keys(&mut self.keys);
        self
    }

    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    #[must_use]
    pub fn keys(&self) -> &[KeyBinding] {
        &self.keys
    }

    /// Look up a key value by name (ASCII case-insensitive).
    #[must_use]
    pub fn key(&self, name: &str) -> Option<&KeyValue> {
        self.keys
            .iter()
            .find(|binding| binding.name.eq_ignore_ascii_case(name))
            .map(|binding| &binding.value)
    }

    pub(crate) fn set_class_name(&mut self, class_name: impl Into<String>) {
        self.class_name = class_name.into();
    }

    pub(crate) fn set_namespace(&mut self, namespace: impl Into<String>) {
        if let Some(namespace) = normalize_namespace(namespace.into()) {
            self.namespace = Some(namespace);
        }
    }

    pub fn parse(text: &str) -> Result<Self, ObjectPathParseError> {
        let mut rest = text.trim();
        if rest.is_empty() {
            return Err(ObjectPathParseError::Empty);
        }

        let mut host = None;
        if let Some(after) = rest.strip_prefix("//") {
            let slash = after
                .find('/')
                .ok_or(ObjectPathParseError::HostWithoutNamespace)?;
            host = Some(after[..slash].to_string());
            rest = &after[slash + 1..];
        }

        // a namespace is only present when ':' precedes the first '.'
        let mut namespace = None;
        if let Some(colon) = rest.find(':') {
            if rest.find('.').is_none_or(|dot| colon < dot) {
                let ns = rest[..colon].trim_start_matches('/');
                if !ns.is_empty() {
                    namespace = Some(ns.to_string());
                }
                rest = &rest[colon + 1..];
            }
        }
        if host.is_some() && namespace.is_none() {
            return Err(ObjectPathParseError::HostWithoutNamespace);
        }

        let (class_name, key_text) = match rest.split_once('.') {
            Some((class_name, key_text)) => (class_name, Some(key_text)),
            None => (rest, None),
        };
        if !is_identifier(class_name) {
            return Err(ObjectPathParseError::InvalidClassName(
                class_name.to_string(),
            ));
        }

        let mut keys = match key_text {
            Some(key_text) if key_text.is_empty() => {
                return Err(ObjectPathParseError::MissingKeys);
            }
            Some(key_text) => parse_keys(key_text)?,
            None => Vec::new(),
        };
        sort_keys(&mut keys);
        if let Some(pair) = keys
            .windows(2)
            .find(|pair| pair[0].name.eq_ignore_ascii_case(&pair[1].name))
        {
            return Err(ObjectPathParseError::DuplicateKey(pair[1].name.clone()));
        }

        Ok(Self {
            host,
            namespace,
            class_name: class_name.to_string(),
            keys,
        })
    }
}

fn normalize_namespace(namespace: String) -> Option<String> {
    let trimmed = namespace.trim_start_matches('/');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn sort_keys(keys: &mut [KeyBinding]) {
    keys.sort_by(|a, b| cmp_ignore_ascii_case(&a.name, &b.name));
}

fn cmp_ignore_ascii_case(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|b| b.to_ascii_lowercase())
        .cmp(b.bytes().map(|b| b.to_ascii_lowercase()))
}

fn is_identifier(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_alphanumeric() || c == '_')
}

fn parse_keys(text: &str) -> Result<Vec<KeyBinding>, ObjectPathParseError> {
    let mut keys = Vec::new();
    let mut rest = text;

    loop {
        let (name, after_name) = rest
            .split_once('=')
            .ok_or_else(|| ObjectPathParseError::InvalidKeyName(rest.to_string()))?;
        let name = name.trim();
        if !is_identifier(name) {
            return Err(ObjectPathParseError::InvalidKeyName(name.to_string()));
        }

        let (value, after_value) = if let Some(quoted) = after_name.strip_prefix('"') {
            let (unescaped, after) = parse_quoted(name, quoted)?;
            (quoted_value(unescaped), after)
        } else {
            let end = after_name.find(',').unwrap_or(after_name.len());
            let token = after_name[..end].trim();
            (bare_value(name, token)?, &after_name[end..])
        };
        keys.push(KeyBinding::new(name, value));

        let mut chars = after_value.chars();
        match chars.next() {
            None => return Ok(keys),
            Some(',') => rest = chars.as_str(),
            Some(other) => return Err(ObjectPathParseError::TrailingCharacter(other)),
        }
    }
}

// Reads a quoted value body (after the opening quote); returns it unescaped
// along with the text after the closing quote.
fn parse_quoted<'a>(key: &str, text: &'a str) -> Result<(String, &'a str), ObjectPathParseError> {
    let mut out = String::new();
    let mut chars = text.char_indices();

    while let Some((i, ch)) = chars.next() {
        match ch {
            '"' => return Ok((out, &text[i + 1..])),
            '\\' => match chars.next() {
                Some((_, escaped @ ('\\' | '"'))) => out.push(escaped),
                Some((_, other)) => return Err(ObjectPathParseError::InvalidEscape(other)),
                None => break,
            },
            _ => out.push(ch),
        }
    }

    Err(ObjectPathParseError::UnterminatedString(key.to_string()))
}

// A quoted value that itself parses as a keyed path is taken as a reference.
fn quoted_value(text: String) -> KeyValue {
    if text.contains('=') {
        if let Ok(path) = ObjectPath::parse(&text) {
            if !path.keys.is_empty() {
                return KeyValue::Reference(Box::new(path));
            }
        }
    }

    KeyValue::String(text)
}

fn bare_value(key: &str, token: &str) -> Result<KeyValue, ObjectPathParseError> {
    if token.eq_ignore_ascii_case("true") {
        return Ok(KeyValue::Boolean(true));
    }
    if token.eq_ignore_ascii_case("false") {
        return Ok(KeyValue::Boolean(false));
    }

    token
        .parse::<i128>()
        .map(KeyValue::Integer)
        .map_err(|_| ObjectPathParseError::InvalidKeyValue {
            key: key.to_string(),
            value: token.to_string(),
        })
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(host) = &self.host {
            write!(f, "//{host}/")?;
        }
        if let Some(namespace) = &self.namespace {
            write!(f, "{namespace}:")?;
        }
        f.write_str(&self.class_name)?;

        for (i, binding) in self.keys.iter().enumerate() {
            let sep = if i == 0 { '.' } else { ',' };
            write!(f, "{sep}{}={}", binding.name, binding.value)?;
        }

        Ok(())
    }
}

fn opt_eq_ignore_ascii_case(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        (None, None) => true,
        _ => false,
    }
}

impl PartialEq for ObjectPath {
    fn eq(&self, other: &Self) -> bool {
        opt_eq_ignore_ascii_case(self.host(), other.host())
            && opt_eq_ignore_ascii_case(self.namespace(), other.namespace())
            && self.class_name.eq_ignore_ascii_case(&other.class_name)
            && self.keys == other.keys
    }
}

impl FromStr for ObjectPath {
    type Err = ObjectPathParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ObjectPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObjectPath {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;

        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_path() {
        let path = ObjectPath::parse(r#"//host1/root/cimv2:CIM_Disk.Name="sda",Index=5,Ready=TRUE"#)
            .unwrap();

        assert_eq!(path.host(), Some("host1"));
        assert_eq!(path.namespace(), Some("root/cimv2"));
        assert_eq!(path.class_name(), "CIM_Disk");
        assert_eq!(path.key("index"), Some(&KeyValue::Integer(5)));
        assert_eq!(path.key("READY"), Some(&KeyValue::Boolean(true)));
        assert_eq!(path.key("name"), Some(&KeyValue::String("sda".to_string())));
    }

    #[test]
    fn keys_are_sorted_on_parse() {
        let path = ObjectPath::parse("A.z=1,b=2,M=3").unwrap();
        let names: Vec<_> = path.keys().iter().map(|k| k.name.as_str()).collect();

        assert_eq!(names, ["b", "M", "z"]);
        assert_eq!(path.to_string(), "A.b=2,M=3,z=1");
    }

    #[test]
    fn namespace_needs_colon_before_first_dot() {
        let path = ObjectPath::parse(r#"Cls.When="12:30""#).unwrap();

        assert_eq!(path.namespace(), None);
        assert_eq!(path.key("when"), Some(&KeyValue::String("12:30".into())));

        let path = ObjectPath::parse("/root/test:Cls").unwrap();
        assert_eq!(path.namespace(), Some("root/test"));
        assert!(path.keys().is_empty());
    }

    #[test]
    fn escapes_roundtrip_through_display() {
        let path = ObjectPath::parse(r#"Cls.k="a \"b\" \\c""#).unwrap();

        assert_eq!(path.key("k"), Some(&KeyValue::String(r#"a "b" \c"#.into())));
        assert_eq!(ObjectPath::parse(&path.to_string()).unwrap(), path);
    }

    #[test]
    fn nested_reference_key_is_detected() {
        let path = ObjectPath::parse(r#"Assoc.Ref="Inner.Id=\"x\"",Label="a=b""#).unwrap();

        let inner = ObjectPath::parse(r#"Inner.Id="x""#).unwrap();
        assert_eq!(path.key("ref"), Some(&KeyValue::Reference(Box::new(inner))));
        assert_eq!(path.key("label"), Some(&KeyValue::String("a=b".into())));
    }

    #[test]
    fn equality_ignores_name_case_but_not_string_values() {
        let a = ObjectPath::parse(r#"root:cls.NAME="x""#).unwrap();
        let b = ObjectPath::parse(r#"ROOT:CLS.name="x""#).unwrap();
        let c = ObjectPath::parse(r#"root:cls.name="X""#).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn numeric_values_compare_numerically() {
        let a = ObjectPath::parse("Cls.k=+5").unwrap();
        let b = ObjectPath::parse("Cls.k=5").unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn built_paths_roundtrip_through_text() {
        let path = ObjectPath::new("CIM_Disk")
            .with_location("h", "/root/cimv2")
            .unwrap()
            .with_key("DeviceID", KeyValue::String("sda".into()));

        assert_eq!(path.to_string(), r#"//h/root/cimv2:CIM_Disk.DeviceID="sda""#);
        assert_eq!(ObjectPath::parse(&path.to_string()).unwrap(), path);

        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(serde_json::from_str::<ObjectPath>(&json).unwrap(), path);
    }

    #[test]
    fn host_requires_namespace() {
        assert_eq!(
            ObjectPath::new("CIM_Disk").with_location("h", "/").unwrap_err(),
            ObjectPathParseError::HostWithoutNamespace
        );

        let bare = ObjectPath::new("CIM_Disk").with_namespace("");
        assert_eq!(bare.namespace(), None);
        assert_eq!(ObjectPath::parse(&bare.to_string()).unwrap(), bare);
    }

    #[test]
    fn with_key_replaces_same_name() {
        let path = ObjectPath::new("CIM_Disk")
            .with_key("DeviceID", KeyValue::String("a".into()))
            .with_key("deviceid", KeyValue::String("b".into()));

        assert_eq!(path.keys().len(), 1);
        assert_eq!(path.key("DEVICEID"), Some(&KeyValue::String("b".into())));
        assert_eq!(ObjectPath::parse(&path.to_string()).unwrap(), path);
    }

    #[test]
    fn rejects_malformed_paths() {
        assert_eq!(ObjectPath::parse(""), Err(ObjectPathParseError::Empty));
        assert_eq!(
            ObjectPath::parse("//host/Cls.k=1"),
            Err(ObjectPathParseError::HostWithoutNamespace)
        );
        assert_eq!(ObjectPath::parse("Cls."), Err(ObjectPathParseError::MissingKeys));
        assert_eq!(
            ObjectPath::parse("Cls.k=1,K=2"),
            Err(ObjectPathParseError::DuplicateKey("K".into()))
        );
        assert_eq!(
            ObjectPath::parse(r#"Cls.k="open"#),
            Err(ObjectPathParseError::UnterminatedString("k".into()))
        );
        assert!(matches!(
            ObjectPath::parse("Cls.k=maybe"),
            Err(ObjectPathParseError::InvalidKeyValue { .. })
        ));
        assert_eq!(
            ObjectPath::parse(r#"Cls.k="a"x"#),
            Err(ObjectPathParseError::TrailingCharacter('x'))
        );
    }
}
