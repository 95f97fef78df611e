use crate::document::{Node, Scalar};
use crate::encoder::Encoder;

/// Rebuild `node` with every scalar leaf replaced by its encoded string.
///
/// The output has the same shape as the input: same keys in the same order,
/// same sequence lengths. Only call this on a raw document. An encoded
/// document is not recognized as such and would be hex-encoded again.
pub fn transcode(encoder: &Encoder<'_>, node: &Node) -> Node {
    match node {
        Node::Mapping(mapping) => Node::Mapping(
            mapping
                .iter()
                .map(|(key, value)| (key, transcode(encoder, value)))
                .collect(),
        ),
        Node::Sequence(items) => {
            Node::Sequence(items.iter().map(|item| transcode(encoder, item)).collect())
        }
        Node::Scalar(scalar) => Node::Scalar(Scalar::String(encoder.encode_scalar(scalar))),
    }
}

impl Encoder<'_> {
    /// Method form of [`transcode`].
    pub fn transcode(&self, node: &Node) -> Node {
        transcode(self, node)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::symbols::SymbolTable;

    fn symbols() -> SymbolTable {
        SymbolTable::from_entries([
            ("Cleaning", "11001100"),
            ("Lamp", "0101"),
            ("Pulse", "1100"),
        ])
        .unwrap()
    }

    #[test]
    fn nested_document_is_encoded_leaf_by_leaf() {
        let table = symbols();
        let encoder = Encoder::new(&table);
        let raw = Node::from_json_str(
            r#"{
                "analytical_group": "LAS",
                "steps": [
                    {"step_name": "Lamp", "purge": "Pulse", "time": 1000},
                    {"step_name": "Cleaning", "purge": 30}
                ],
                "enabled": true
            }"#,
        )
        .unwrap();

        let encoded = encoder.transcode(&raw);
        let expected = Node::from_json_str(
            r#"{
                "analytical_group": "4c4153",
                "steps": [
                    {"step_name": "0101", "purge": "1100", "time": "01100100"},
                    {"step_name": "11001100", "purge": "00000011"}
                ],
                "enabled": "00000000"
            }"#,
        )
        .unwrap();
        assert_eq!(encoded, expected);
    }

    #[test]
    fn top_level_scalar_is_encoded() {
        let table = SymbolTable::new();
        let encoder = Encoder::new(&table);
        let encoded = transcode(&encoder, &Node::Scalar(Scalar::Integer(3000)));
        assert_eq!(encoded, Node::string("100101100"));
    }

    #[test]
    fn empty_containers_are_kept() {
        let table = SymbolTable::new();
        let encoder = Encoder::new(&table);
        let raw = Node::from_json_str(r#"{"a": {}, "b": []}"#).unwrap();
        assert_eq!(encoder.transcode(&raw), raw);
    }

    #[test]
    fn transcoding_twice_re_encodes() {
        let table = symbols();
        let encoder = Encoder::new(&table);
        let once = encoder.transcode(&Node::string("Lamp"));
        let twice = encoder.transcode(&once);
        assert_eq!(once, Node::string("0101"));
        assert_eq!(twice, Node::string("30313031"));
    }

    fn leaf() -> impl Strategy<Value = Node> {
        prop_oneof![
            "[a-zA-Z0-9 ]{0,8}".prop_map(Node::string),
            any::<i64>().prop_map(|n| Node::Scalar(Scalar::Integer(i128::from(n)))),
            (-1.0e6f64..1.0e6).prop_map(|f| Node::Scalar(Scalar::Float(f))),
            any::<bool>().prop_map(|b| Node::Scalar(Scalar::Other(serde_json::Value::Bool(b)))),
        ]
    }

    fn document() -> impl Strategy<Value = Node> {
        leaf().prop_recursive(4, 64, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Node::Sequence),
                prop::collection::vec(("[a-z_]{1,6}", inner), 0..6)
                    .prop_map(|entries| Node::Mapping(entries.into_iter().collect())),
            ]
        })
    }

    fn assert_same_shape(raw: &Node, encoded: &Node) -> Result<(), TestCaseError> {
        match (raw, encoded) {
            (Node::Mapping(a), Node::Mapping(b)) => {
                prop_assert_eq!(a.keys().collect::<Vec<_>>(), b.keys().collect::<Vec<_>>());
                for ((_, x), (_, y)) in a.iter().zip(b.iter()) {
                    assert_same_shape(x, y)?;
                }
            }
            (Node::Sequence(a), Node::Sequence(b)) => {
                prop_assert_eq!(a.len(), b.len());
                for (x, y) in a.iter().zip(b) {
                    assert_same_shape(x, y)?;
                }
            }
            (Node::Scalar(_), Node::Scalar(Scalar::String(_))) => {}
            (x, y) => prop_assert!(false, "shape mismatch: {} vs {}", x.kind(), y.kind()),
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn prop_transcode_preserves_shape(raw in document()) {
            let table = symbols();
            let encoder = Encoder::new(&table);
            let encoded = encoder.transcode(&raw);
            assert_same_shape(&raw, &encoded)?;
        }
    }
}
