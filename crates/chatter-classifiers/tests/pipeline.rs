use chatter_classifiers::config::{ExtractorConfig, ModelConfig};
use chatter_classifiers::data_handling::Record;
use chatter_classifiers::error::ClassifierError;
use chatter_classifiers::pipeline::TweetClassificationModel;

fn extractor_config() -> ExtractorConfig {
    ExtractorConfig {
        reference_year: Some(2018),
        ..ExtractorConfig::default()
    }
}

fn corpus() -> Vec<Record> {
    let rows = [
        ("alice", "to the moon #btc", 50, "bull"),
        ("amber", "buying more, moon soon", 80, "bull"),
        ("adam", "pump it to 100k #btc #eth", 300, "bull"),
        ("bob", "selling everything", 5000, "bear"),
        ("brad", "crash incoming, selling now", 12000, "bear"),
        ("bert", "dump it all", 2500, "bear"),
        ("nina", "what is a blockchain", 150, "neutral"),
        ("nick", "reading about ledgers today", 400, "neutral"),
    ];
    rows.iter()
        .map(|&(handle, text, followers, label)| {
            Record::new(handle, text)
                .with_followers(followers)
                .with_label(label)
        })
        .collect()
}

fn held_out() -> Vec<Record> {
    vec![
        Record::new("carol", "to the moon").with_followers(60),
        Record::new("dan", "selling my bags").with_followers(7000),
        Record::new("zed", "qwerty asdf"),
        Record::new("erin", "").with_description("I love my coins, going to the moon"),
        Record::new("frank", "#a #b #c #d blockchain"),
    ]
}

fn trained(k: usize) -> TweetClassificationModel {
    let mut model = TweetClassificationModel::new(ModelConfig::new(k, Default::default()), extractor_config())
        .expect("valid configuration");
    model.train(&corpus()).expect("training succeeds");
    model
}

#[test]
fn test_shared_ngrams_predict_bull() {
    let mut model = TweetClassificationModel::new(ModelConfig::default(), extractor_config()).unwrap();
    model
        .train(&[
            Record::new("alice", "to the moon #btc")
                .with_followers(50)
                .with_label("bull"),
            Record::new("bob", "selling everything")
                .with_followers(5000)
                .with_label("bear"),
        ])
        .unwrap();

    let carol = Record::new("carol", "to the moon").with_followers(60);
    let features = model.features_for(&carol);
    for name in ["to", "the", "moon", "to_the", "the_moon", "followers=<100"] {
        assert!(features.contains(name), "missing {}", name);
    }
    assert_eq!(model.predict_one(&carol).unwrap(), "bull");
    assert_eq!(model.predict(&[carol]).unwrap(), vec!["bull"]);
}

#[test]
fn test_dump_load_predicts_identically() {
    let model = trained(400);
    let expected = model.predict(&held_out()).unwrap();
    let expected_margins = model.decision_function(&held_out()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    model.dump(dir.path()).unwrap();
    let restored = TweetClassificationModel::load(dir.path()).unwrap();

    assert!(restored.is_ready());
    assert_eq!(restored.run_id(), model.run_id());
    assert_eq!(restored.classes().unwrap(), model.classes().unwrap());
    assert_eq!(restored.predict(&held_out()).unwrap(), expected);
    assert_eq!(restored.decision_function(&held_out()).unwrap(), expected_margins);
    for (record, label) in held_out().iter().zip(&expected) {
        assert_eq!(&restored.predict_one(record).unwrap(), label);
    }
}

#[test]
fn test_training_is_deterministic() {
    let first = trained(400);
    let second = trained(400);
    assert_eq!(
        first.predict(&held_out()).unwrap(),
        second.predict(&held_out()).unwrap()
    );
    assert_eq!(
        first.decision_function(&corpus()).unwrap(),
        second.decision_function(&corpus()).unwrap()
    );
}

#[test]
fn test_unseen_features_still_get_a_label() {
    let model = trained(400);
    let classes = model.classes().unwrap().to_vec();

    let unknown = Record::new("qqqq", "zzz yyy xxx");
    let label = model.predict_one(&unknown).unwrap();
    assert!(classes.contains(&label));

    let empty = Record::new("zed", "");
    let features = model.features_for(&empty);
    assert!(!features.is_empty());
    assert!(features.contains("hashtags=0"));
    assert!(classes.contains(&model.predict_one(&empty).unwrap()));
}

#[test]
fn test_k_larger_than_vocabulary_selects_everything() {
    let model = trained(1_000_000);
    let vocabulary = model.vocabulary().unwrap().len();
    assert_eq!(model.selected_feature_names().unwrap().len(), vocabulary);
}

#[test]
fn test_small_k_keeps_most_discriminative_features() {
    let model = trained(5);
    let selected = model.selected_feature_names().unwrap();
    assert_eq!(selected.len(), 5);
    // Present in every record: carries no information about the label
    assert!(!selected.contains(&"handle_has_vowel=True"));
}

#[test]
fn test_untrained_model_reports_not_ready() {
    let model = TweetClassificationModel::new(ModelConfig::default(), extractor_config()).unwrap();
    assert!(matches!(model.predict(&held_out()), Err(ClassifierError::NotReady)));
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(model.dump(dir.path()), Err(ClassifierError::NotReady)));
}

#[test]
fn test_retraining_replaces_the_run() {
    let mut model = trained(400);
    let first_run = model.run_id().map(str::to_string);
    model.train(&corpus()).unwrap();
    assert_ne!(model.run_id().map(str::to_string), first_run);
}

#[test]
fn test_concurrent_prediction_shares_the_model() {
    let model = trained(400);
    let expected = model.predict(&held_out()).unwrap();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| model.predict(&held_out()).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
