//! Per-file owner-reference injection.
//!
//! A rendered file is split on `---` separator lines, each document is loaded
//! with YAML 1.1 scalar rules into a [`serde_yaml::Value`], converted to a [`ManifestObject`], annotated,
//! and re-encoded. Empty documents disappear from the output; the order of the
//! remaining documents is preserved.

use serde_yaml::{Mapping, Value};

use ownerref_core::OwnerReference;

use crate::error::InjectError;
use crate::yaml::load_document;

const SEPARATOR: &str = "---";
const METADATA: &str = "metadata";
const OWNER_REFERENCES: &str = "ownerReferences";

// ---------------------------------------------------------------------------
// Splitting
// ---------------------------------------------------------------------------

/// Split multi-document YAML text into its documents, in order.
///
/// A line starting with `---` followed by whitespace or end-of-line closes the
/// current document. Anything after the dashes on that line (typically a
/// `# Source:` comment) is kept at the start of the next document. `%`
/// directive lines directly before a separator belong to the document the
/// separator opens, so they travel with it together with the separator line.
/// Empty documents are returned as-is; callers decide what to do with them.
pub fn split_documents(text: &str) -> Vec<&str> {
    let mut docs = Vec::new();
    let mut start = 0;
    let mut offset = 0;
    let mut directives: Option<usize> = None;
    for line in text.split_inclusive('\n') {
        if is_separator(line) {
            match directives.take() {
                Some(at) => {
                    docs.push(&text[start..at]);
                    start = at;
                }
                None => {
                    docs.push(&text[start..offset]);
                    start = offset + SEPARATOR.len();
                }
            }
        } else if line.starts_with('%') {
            directives.get_or_insert(offset);
        } else if !is_blank(line) {
            directives = None;
        }
        offset += line.len();
    }
    docs.push(&text[start..]);
    docs
}

fn is_separator(line: &str) -> bool {
    line.strip_prefix(SEPARATOR)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

// ---------------------------------------------------------------------------
// ManifestObject
// ---------------------------------------------------------------------------

/// A manifest document in its generic object form.
///
/// Guarantees every top-level key is a string and `metadata`, when present, is
/// a mapping or null. Field order is the order of the source document.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestObject {
    fields: Mapping,
}

impl ManifestObject {
    /// Convert a parsed document, describing why it is not an object on failure.
    pub fn from_value(value: Value) -> Result<Self, String> {
        let fields = match value {
            Value::Mapping(fields) => fields,
            other => return Err(format!("expected a mapping, found {}", kind_of(&other))),
        };
        if let Some(key) = fields.keys().find(|k| !k.is_string()) {
            return Err(format!("top-level key {} is not a string", describe_key(key)));
        }
        match fields.get(METADATA) {
            None | Some(Value::Null) | Some(Value::Mapping(_)) => {}
            Some(other) => {
                return Err(format!("metadata must be a mapping, found {}", kind_of(other)));
            }
        }
        Ok(Self { fields })
    }

    /// Set `metadata.ownerReferences`, replacing any existing value in place.
    pub fn set_owner_references(&mut self, refs: Value) {
        let key = Value::String(OWNER_REFERENCES.to_string());
        match self.fields.get_mut(METADATA) {
            Some(Value::Mapping(metadata)) => {
                metadata.insert(key, refs);
            }
            _ => {
                let mut metadata = Mapping::new();
                metadata.insert(key, refs);
                self.fields
                    .insert(Value::String(METADATA.to_string()), Value::Mapping(metadata));
            }
        }
    }

    pub fn owner_references(&self) -> Option<&Value> {
        match self.fields.get(METADATA) {
            Some(Value::Mapping(metadata)) => metadata.get(OWNER_REFERENCES),
            _ => None,
        }
    }

    pub fn fields(&self) -> &Mapping {
        &self.fields
    }

    pub fn into_value(self) -> Value {
        Value::Mapping(self.fields)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.fields)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

fn describe_key(key: &Value) -> String {
    match serde_yaml::to_string(key) {
        Ok(s) => format!("`{}`", s.trim_end()),
        Err(_) => kind_of(key).to_string(),
    }
}

// ---------------------------------------------------------------------------
// Injection
// ---------------------------------------------------------------------------

/// Only whitespace and comment lines.
fn is_blank(doc: &str) -> bool {
    doc.lines().all(|line| {
        let line = line.trim_start();
        line.is_empty() || line.starts_with('#')
    })
}

/// Parse one document; `None` when it holds nothing worth annotating.
fn parse_document(index: usize, doc: &str) -> Result<Option<Value>, InjectError> {
    if is_blank(doc) {
        return Ok(None);
    }
    let value = load_document(doc).map_err(|source| InjectError::Parse { document: index, source })?;
    match &value {
        Value::Null => Ok(None),
        Value::Mapping(m) if m.is_empty() => Ok(None),
        _ => Ok(Some(value)),
    }
}

/// Add `refs` as `metadata.ownerReferences` to every document in `text`.
///
/// Returns an empty string when the file holds no non-empty documents, which
/// callers treat as "drop this file".
pub fn inject_owner_refs(text: &str, refs: &[OwnerReference]) -> Result<String, InjectError> {
    let encoded_refs = serde_yaml::to_value(refs).map_err(InjectError::Serialize)?;

    let mut out = String::new();
    for (index, doc) in split_documents(text).into_iter().enumerate() {
        let Some(value) = parse_document(index, doc)? else {
            continue;
        };
        let mut object = ManifestObject::from_value(value)
            .map_err(|reason| InjectError::Convert { document: index, reason })?;
        object.set_owner_references(encoded_refs.clone());

        let encoded = object.to_yaml().map_err(InjectError::Serialize)?;
        if !out.is_empty() {
            out.push_str(SEPARATOR);
            out.push('\n');
        }
        out.push_str(&encoded);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use ownerref_core::types::{controller_reference, owner_reference};
    use rstest::rstest;

    fn refs() -> Vec<OwnerReference> {
        vec![owner_reference("app/v1", "MyApp", "instance1", "abc-123")]
    }

    fn docs(text: &str) -> Vec<Value> {
        split_documents(text)
            .into_iter()
            .filter(|d| !d.trim().is_empty())
            .map(|d| serde_yaml::from_str(d).unwrap())
            .collect()
    }

    #[rstest]
    #[case::single("a: 1\n", 1)]
    #[case::leading_separator("---\na: 1\n", 2)]
    #[case::trailing_separator("a: 1\n---\n", 2)]
    #[case::three("a: 1\n---\nb: 2\n---\nc: 3\n", 3)]
    #[case::source_comment("---\n# Source: x.yaml\na: 1\n--- # Source: y.yaml\nb: 2\n", 3)]
    #[case::no_trailing_newline("a: 1\n---", 2)]
    fn split_counts(#[case] text: &str, #[case] expected: usize) {
        assert_eq!(split_documents(text).len(), expected);
    }

    #[test]
    fn split_ignores_dashes_that_are_not_separators() {
        let text = "a: ---\nb: |\n  ----\n---x: 1\n";
        assert_eq!(split_documents(text), vec![text]);
    }

    #[test]
    fn split_keeps_text_after_separator_in_next_document() {
        let parts = split_documents("a: 1\n--- # Source: b.yaml\nb: 2\n");
        assert_eq!(parts, vec!["a: 1\n", " # Source: b.yaml\nb: 2\n"]);
    }

    #[test]
    fn single_document_gets_owner_references() {
        let out = inject_owner_refs(
            "apiVersion: v1\nkind: Service\nmetadata:\n  name: foo\n",
            &refs(),
        )
        .unwrap();
        let expected: Value = serde_yaml::from_str(
            "apiVersion: v1\nkind: Service\nmetadata:\n  name: foo\n  ownerReferences:\n  - apiVersion: app/v1\n    kind: MyApp\n    name: instance1\n    uid: abc-123\n",
        )
        .unwrap();
        assert_eq!(docs(&out), vec![expected]);
    }

    #[test]
    fn metadata_created_when_absent() {
        let out = inject_owner_refs("kind: ConfigMap\ndata:\n  k: v\n", &refs()).unwrap();
        let value: Value = serde_yaml::from_str(&out).unwrap();
        assert_eq!(value["metadata"]["ownerReferences"][0]["uid"], "abc-123");
        assert_eq!(value["data"]["k"], "v");
    }

    #[test]
    fn null_metadata_is_replaced() {
        let out = inject_owner_refs("kind: ConfigMap\nmetadata:\n", &refs()).unwrap();
        let value: Value = serde_yaml::from_str(&out).unwrap();
        assert_eq!(value["metadata"]["ownerReferences"][0]["name"], "instance1");
    }

    #[test]
    fn existing_owner_references_are_overwritten() {
        let input = "kind: Pod\nmetadata:\n  name: p\n  ownerReferences:\n  - apiVersion: old/v1\n    kind: Old\n    name: old\n    uid: old-uid\n  labels:\n    app: p\n";
        let once = inject_owner_refs(input, &refs()).unwrap();
        let twice = inject_owner_refs(&once, &refs()).unwrap();
        assert_eq!(once, twice);

        let value: Value = serde_yaml::from_str(&twice).unwrap();
        let owners = value["metadata"]["ownerReferences"].as_sequence().unwrap();
        assert_eq!(owners.len(), 1);
        assert_eq!(owners[0]["uid"], "abc-123");

        let keys: Vec<_> = value["metadata"]
            .as_mapping()
            .unwrap()
            .keys()
            .map(|k| k.as_str().unwrap().to_string())
            .collect();
        assert_eq!(keys, vec!["name", "ownerReferences", "labels"], "replaced in place");
    }

    #[test]
    fn other_fields_and_key_order_preserved() {
        let input = "kind: Deployment\napiVersion: apps/v1\nmetadata:\n  name: web\n  labels:\n    tier: front\nspec:\n  replicas: 3\n  template:\n    spec:\n      containers:\n      - name: web\n        image: nginx:1.25\n        ports:\n        - containerPort: 80\n";
        let out = inject_owner_refs(input, &refs()).unwrap();
        let before: Value = serde_yaml::from_str(input).unwrap();
        let mut after: Value = serde_yaml::from_str(&out).unwrap();

        let top: Vec<_> = after.as_mapping().unwrap().keys().cloned().collect();
        assert_eq!(top, vec!["kind", "apiVersion", "metadata", "spec"]);

        after["metadata"]
            .as_mapping_mut()
            .unwrap()
            .remove("ownerReferences");
        assert_eq!(before, after);
    }

    #[test]
    fn multiple_documents_keep_order_and_drop_empties() {
        let input = "---\nkind: A\n---\n\n---\n# only a comment\n---\nkind: B\n---\n{}\n---\nkind: C\n";
        let out = inject_owner_refs(input, &refs()).unwrap();
        let kinds: Vec<_> = docs(&out)
            .iter()
            .map(|d| d["kind"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(kinds, vec!["A", "B", "C"]);
        for d in docs(&out) {
            assert_eq!(d["metadata"]["ownerReferences"][0]["kind"], "MyApp");
        }
        assert_eq!(out.matches("---\n").count(), 2);
        assert!(!out.starts_with("---"));
    }

    #[test]
    fn one_empty_one_populated_yields_one_document() {
        let out = inject_owner_refs("\n---\nkind: Service\nmetadata:\n  name: foo\n", &refs()).unwrap();
        assert_eq!(docs(&out).len(), 1);
        assert!(!out.contains("---"));
    }

    #[rstest]
    #[case::empty("")]
    #[case::blank("  \n\n")]
    #[case::separators_only("---\n---\n")]
    #[case::comment_only("# nothing rendered\n")]
    #[case::empty_mapping("{}\n")]
    fn nothing_to_annotate_yields_empty_string(#[case] input: &str) {
        assert_eq!(inject_owner_refs(input, &refs()).unwrap(), "");
    }

    #[test]
    fn json_documents_are_accepted() {
        let out = inject_owner_refs(
            r#"{"apiVersion": "v1", "kind": "Secret", "metadata": {"name": "s"}}"#,
            &refs(),
        )
        .unwrap();
        let value: Value = serde_yaml::from_str(&out).unwrap();
        assert_eq!(value["kind"], "Secret");
        assert_eq!(value["metadata"]["ownerReferences"][0]["apiVersion"], "app/v1");
    }

    #[test]
    fn controller_flags_serialized_with_api_names() {
        let out = inject_owner_refs(
            "kind: Service\n",
            &[controller_reference("app/v1", "MyApp", "instance1", "abc-123")],
        )
        .unwrap();
        let value: Value = serde_yaml::from_str(&out).unwrap();
        let owner = &value["metadata"]["ownerReferences"][0];
        assert_eq!(owner["controller"], true);
        assert_eq!(owner["blockOwnerDeletion"], true);
    }

    #[test]
    fn parse_error_reports_document_index() {
        let err = inject_owner_refs("kind: A\n---\nkind: [unclosed\n", &refs()).unwrap_err();
        assert!(matches!(err, InjectError::Parse { document: 1, .. }), "got: {err}");
        assert!(err.to_string().contains("error parsing rendered template"));
    }

    #[test]
    fn octal_file_mode_keeps_integer_meaning() {
        let input = "kind: Deployment\nspec:\n  volumes:\n  - name: cfg\n    configMap:\n      defaultMode: 0644\n";
        let out = inject_owner_refs(input, &refs()).unwrap();
        assert!(out.contains("defaultMode: 420"), "got: {out}");
        assert!(!out.contains("'0644'"), "got: {out}");
        let value: Value = serde_yaml::from_str(&out).unwrap();
        assert_eq!(value["spec"]["volumes"][0]["configMap"]["defaultMode"], 420);
    }

    #[test]
    fn yaml_1_1_plain_scalars_resolve_like_kubernetes() {
        let input = "kind: A\ndata:\n  mode: '0644'\n  hex: 0x1F\n  big: 1_000\n  flag: yes\n  word: \"yes\"\n  tagged: !!str 123\n";
        let out = inject_owner_refs(input, &refs()).unwrap();
        let value: Value = serde_yaml::from_str(&out).unwrap();
        let data = &value["data"];
        assert_eq!(data["mode"], "0644");
        assert_eq!(data["hex"], 31);
        assert_eq!(data["big"], 1000);
        assert_eq!(data["flag"], true);
        assert_eq!(data["word"], "yes");
        assert_eq!(data["tagged"], "123");
    }

    #[test]
    fn anchors_and_aliases_are_expanded() {
        let input = "kind: A\nmetadata:\n  labels: &l\n    app: web\nspec:\n  selector: *l\n";
        let out = inject_owner_refs(input, &refs()).unwrap();
        let value: Value = serde_yaml::from_str(&out).unwrap();
        assert_eq!(value["spec"]["selector"]["app"], "web");
    }

    #[test]
    fn directives_stay_with_the_document_they_precede() {
        let parts = split_documents("%YAML 1.2\n---\nkind: A\n");
        assert_eq!(parts, vec!["", "%YAML 1.2\n---\nkind: A\n"]);

        let parts = split_documents("kind: A\n---\n%TAG !e! tag:example.com,2000:\n# note\n--- # Source: b\nkind: B\n");
        assert_eq!(
            parts,
            vec!["kind: A\n", "\n", "%TAG !e! tag:example.com,2000:\n# note\n--- # Source: b\nkind: B\n"]
        );
    }

    #[test]
    fn document_with_version_directive_is_annotated() {
        let out = inject_owner_refs("%YAML 1.2\n---\nkind: A\n", &refs()).unwrap();
        let value: Value = serde_yaml::from_str(&out).unwrap();
        assert_eq!(value["kind"], "A");
        assert_eq!(value["metadata"]["ownerReferences"][0]["uid"], "abc-123");
    }

    #[rstest]
    #[case::sequence("- a\n- b\n")]
    #[case::scalar("just a string\n")]
    #[case::scalar_metadata("kind: A\nmetadata: nope\n")]
    #[case::list_metadata("kind: A\nmetadata:\n- x\n")]
    #[case::non_string_key("1: one\nkind: A\n")]
    fn non_objects_fail_conversion(#[case] input: &str) {
        let err = inject_owner_refs(input, &refs()).unwrap_err();
        assert!(matches!(err, InjectError::Convert { document: 0, .. }), "got: {err}");
    }

    #[test]
    fn manifest_object_reports_owner_references() {
        let value: Value = serde_yaml::from_str("kind: A\nmetadata:\n  name: a\n").unwrap();
        let mut object = ManifestObject::from_value(value).unwrap();
        assert!(object.owner_references().is_none());
        object.set_owner_references(serde_yaml::to_value(refs()).unwrap());
        assert_eq!(object.owner_references().unwrap()[0]["name"], "instance1");
        assert_eq!(object.fields().len(), 2);
        assert!(object.into_value().is_mapping());
    }
}
