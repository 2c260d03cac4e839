use bbpe::{ConfigError, MergeEntry, RawConfig, Tokenizer, TokenizerOptions};
use serde_json::json;

fn base_vocab() -> serde_json::Value {
    json!({
        "<s>": 0, "<pad>": 1, "</s>": 2, "<unk>": 3,
        "l": 4, "o": 5, "w": 6, "lo": 7, "low": 8
    })
}

#[test]
fn missing_vocab_is_rejected() {
    let doc = json!({ "merges": ["l o"] });
    let err = Tokenizer::from_json_str(&doc.to_string()).expect_err("missing vocab");
    assert!(matches!(err, ConfigError::MissingVocab), "{err}");
}

#[test]
fn missing_merges_is_rejected() {
    let doc = json!({ "vocab": base_vocab() });
    let err = Tokenizer::from_json_str(&doc.to_string()).expect_err("missing merges");
    assert!(matches!(err, ConfigError::MissingMerges), "{err}");
}

#[test]
fn empty_merge_list_is_valid() -> anyhow::Result<()> {
    let doc = json!({ "vocab": base_vocab(), "merges": [] });
    let tokenizer = Tokenizer::from_json_str(&doc.to_string())?;
    assert!(tokenizer.merges().is_empty());
    assert_eq!(tokenizer.encode_with_max_length("owl", 6), vec![0, 5, 6, 4, 2, 1]);
    Ok(())
}

#[test]
fn malformed_merges_are_skipped_without_error() -> anyhow::Result<()> {
    let clean = json!({ "vocab": base_vocab(), "merges": ["l o", ["lo", "w"]] });
    let noisy = json!({
        "vocab": base_vocab(),
        "merges": ["x", "l o", ["a", "b", "c"], 42, null, ["lo", "w"], "q r s", ["", "o"]]
    });
    let clean = Tokenizer::from_json_str(&clean.to_string())?;
    let noisy = Tokenizer::from_json_str(&noisy.to_string())?;

    assert_eq!(noisy.merges().len(), 2);
    assert_eq!(noisy.merges().skipped(), 6);
    for text in ["low", "low low", "owl"] {
        assert_eq!(
            noisy.encode_with_max_length(text, 8),
            clean.encode_with_max_length(text, 8)
        );
    }
    assert_eq!(noisy.encode_with_max_length("low", 4), vec![0, 8, 2, 1]);
    Ok(())
}

#[test]
fn special_ids_fall_back_to_fixed_defaults() -> anyhow::Result<()> {
    let doc = json!({ "vocab": { "a": 10, "b": 11 }, "merges": [] });
    let tokenizer = Tokenizer::from_json_str(&doc.to_string())?;
    let vocab = tokenizer.vocab();
    assert_eq!(
        (vocab.cls_id(), vocab.sep_id(), vocab.pad_id(), vocab.unk_id()),
        (0, 2, 1, 3)
    );
    assert_eq!(tokenizer.encode_with_max_length("ab z", 7), vec![0, 10, 11, 3, 2, 1, 1]);
    Ok(())
}

#[test]
fn special_ids_come_from_vocab_when_present() -> anyhow::Result<()> {
    let doc = json!({
        "vocab": { "<s>": 50, "</s>": 51, "<pad>": 52, "<unk>": 53, "a": 0 },
        "merges": []
    });
    let tokenizer = Tokenizer::from_json_str(&doc.to_string())?;
    assert_eq!(tokenizer.encode_with_max_length("a b", 6), vec![50, 0, 53, 51, 52, 52]);
    Ok(())
}

#[test]
fn config_max_length_overrides_default() -> anyhow::Result<()> {
    let doc = json!({ "vocab": base_vocab(), "merges": [], "maxLength": 8 });
    let tokenizer: Tokenizer = doc.to_string().parse()?;
    assert_eq!(tokenizer.options().max_length, 8);
    assert_eq!(tokenizer.encode("low").len(), 8);

    let options = TokenizerOptions {
        max_length: 32,
        ..TokenizerOptions::default()
    };
    let doc = json!({ "vocab": base_vocab(), "merges": [] });
    let config = RawConfig::from_json_str(&doc.to_string())?;
    let tokenizer = Tokenizer::with_options(config, options)?;
    assert_eq!(tokenizer.encode("low").len(), 32);
    Ok(())
}

#[test]
fn merge_pass_limit_is_configurable() -> anyhow::Result<()> {
    let config = RawConfig {
        vocab: serde_json::from_value(base_vocab())?,
        merges: Some(vec![MergeEntry::joined("l o"), MergeEntry::pair("lo", "w")]),
        max_length: None,
    };
    let options = TokenizerOptions {
        max_merge_passes: 1,
        ..TokenizerOptions::default()
    };
    let tokenizer = Tokenizer::with_options(config, options)?;
    assert_eq!(tokenizer.tokenize("lowo"), vec!["lo", "w", "o"]);
    assert_eq!(tokenizer.encode_with_max_length("lowo", 5), vec![0, 7, 6, 5, 2]);
    Ok(())
}

#[test]
fn hugging_face_documents_are_accepted() -> anyhow::Result<()> {
    let doc = json!({
        "version": "1.0",
        "truncation": null,
        "added_tokens": [{ "id": 0, "content": "<s>", "special": true }],
        "model": {
            "type": "BPE",
            "dropout": null,
            "unk_token": null,
            "vocab": base_vocab(),
            "merges": [["l", "o"], ["lo", "w"]]
        }
    });
    let tokenizer = Tokenizer::from_json_str(&doc.to_string())?;
    assert_eq!(tokenizer.vocab_size(), 9);
    assert_eq!(tokenizer.options().max_length, 512);
    assert_eq!(tokenizer.encode_with_max_length("low", 4), vec![0, 8, 2, 1]);
    Ok(())
}
