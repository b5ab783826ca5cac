use aspectra::{AspectExtractor, AspectRecord, ExtractionError, Sentence, TokenRecord};

fn parse(json: &str) -> Vec<TokenRecord> {
    serde_json::from_str(json).expect("valid token json")
}

#[test]
fn test_internet_was_slow() -> Result<(), ExtractionError> {
    let tokens = parse(
        r#"[
            {"text": "The", "pos": "DET", "dep": "det", "head": 1, "children": []},
            {"text": "internet", "pos": "NOUN", "dep": "nsubj", "head": 2, "children": [0]},
            {"text": "was", "pos": "AUX", "dep": "ROOT", "head": 2, "children": [1, 3, 4]},
            {"text": "slow", "pos": "ADJ", "dep": "acomp", "head": 2, "children": []},
            {"text": ".", "pos": "PUNCT", "dep": "punct", "head": 2, "children": []}
        ]"#,
    );
    let record = AspectExtractor::new().extract_records(&tokens)?;
    assert_eq!(record, AspectRecord::new("internet", "slow"));
    Ok(())
}

#[test]
fn test_food_we_had_yesterday() -> Result<(), ExtractionError> {
    // The food we had yesterday was delicious
    let tokens = vec![
        TokenRecord::new("The", "DET", "det", 1, vec![]),
        TokenRecord::new("food", "NOUN", "nsubj", 5, vec![0, 3]),
        TokenRecord::new("we", "PRON", "nsubj", 3, vec![]),
        TokenRecord::new("had", "VERB", "relcl", 1, vec![2, 4]),
        TokenRecord::new("yesterday", "NOUN", "npadvmod", 3, vec![]),
        TokenRecord::new("was", "AUX", "ROOT", 5, vec![1, 6]),
        TokenRecord::new("delicious", "ADJ", "acomp", 5, vec![]),
    ];
    let record = AspectExtractor::new().extract_records(&tokens)?;
    assert_eq!(record, AspectRecord::new("food", "delicious"));
    Ok(())
}

#[test]
fn test_later_subject_overrides_earlier() -> Result<(), ExtractionError> {
    let tokens = vec![
        TokenRecord::new("A", "NOUN", "nsubj", 1, vec![]),
        TokenRecord::new("and", "CCONJ", "ROOT", 1, vec![0, 2]),
        TokenRecord::new("B", "NOUN", "nsubj", 1, vec![]),
    ];
    let record = AspectExtractor::new().extract_records(&tokens)?;
    assert_eq!(record.aspect, "B");
    assert_eq!(record.description, "");
    Ok(())
}

#[test]
fn test_adverb_outside_adjective_is_ignored() -> Result<(), ExtractionError> {
    // Sadly the service was slow: "Sadly" modifies the verb, not the adjective
    let tokens = vec![
        TokenRecord::new("Sadly", "ADV", "advmod", 3, vec![]),
        TokenRecord::new("the", "DET", "det", 2, vec![]),
        TokenRecord::new("service", "NOUN", "nsubj", 3, vec![1]),
        TokenRecord::new("was", "AUX", "ROOT", 3, vec![0, 2, 4]),
        TokenRecord::new("slow", "ADJ", "acomp", 3, vec![]),
    ];
    let record = AspectExtractor::new().extract_records(&tokens)?;
    assert_eq!(record, AspectRecord::new("service", "slow"));
    Ok(())
}

#[test]
fn test_missing_children_is_an_error_not_an_empty_result() {
    let tokens = parse(
        r#"[
            {"text": "Food", "pos": "NOUN", "dep": "nsubj", "head": 1},
            {"text": "rocks", "pos": "VERB", "dep": "ROOT", "head": 1, "children": [0]}
        ]"#,
    );
    let err = AspectExtractor::new().extract_records(&tokens).unwrap_err();
    assert!(matches!(err, ExtractionError::MissingField { index: 0, field: "children", .. }));
    assert!(err.to_string().contains("Malformed input"));
}

#[test]
fn test_extract_all() {
    let sentences: Vec<Sentence> = ["tasty", "bland"]
        .iter()
        .map(|adj| {
            Sentence::from_records(vec![
                TokenRecord::new("meal", "NOUN", "nsubj", 1, vec![]),
                TokenRecord::new("was", "AUX", "ROOT", 1, vec![0, 2]),
                TokenRecord::new(*adj, "ADJ", "acomp", 1, vec![]),
            ])
            .unwrap()
        })
        .collect();
    let records = AspectExtractor::new().extract_all(&sentences);
    assert_eq!(records[0], AspectRecord::new("meal", "tasty"));
    assert_eq!(records[1], AspectRecord::new("meal", "bland"));
}

#[test]
fn test_inconsistent_tree_is_malformed_input() {
    // "very" hangs off "was" yet is listed twice under "slow", which claims to be a root
    let tokens = vec![
        TokenRecord::new("internet", "NOUN", "nsubj", 2, vec![]),
        TokenRecord::new("very", "ADV", "advmod", 2, vec![]),
        TokenRecord::new("was", "AUX", "ROOT", 2, vec![0, 1, 3]),
        TokenRecord::new("slow", "ADJ", "ROOT", 2, vec![1, 1]),
    ];
    let err = AspectExtractor::new().extract_records(&tokens).unwrap_err();
    assert!(matches!(err, ExtractionError::InvalidTree { index: 3, .. }));
}
