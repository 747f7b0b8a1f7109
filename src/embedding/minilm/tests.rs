use super::*;
use crate::embedding::cosine_similarity;
use std::path::PathBuf;

mod config_tests {
    use super::*;

    #[test]
    fn test_minilm_config_default() {
        let config = MiniLmConfig::default();
        assert_eq!(config.embedding_dim, MINILM_EMBEDDING_DIM);
        assert_eq!(config.max_seq_len, MINILM_MAX_SEQ_LEN);
        assert!(!config.testing_stub);
        assert!(config.model_dir.as_os_str().is_empty());
    }

    #[test]
    fn test_minilm_config_paths() {
        let config = MiniLmConfig::new("/models/all-MiniLM-L6-v2");
        assert_eq!(
            config.config_path(),
            PathBuf::from("/models/all-MiniLM-L6-v2/config.json")
        );
        assert_eq!(
            config.weights_path(),
            PathBuf::from("/models/all-MiniLM-L6-v2/model.safetensors")
        );
        assert_eq!(
            config.tokenizer_path(),
            PathBuf::from("/models/all-MiniLM-L6-v2/tokenizer.json")
        );
    }

    #[test]
    fn test_minilm_config_stub_validates() {
        assert!(MiniLmConfig::stub().validate().is_ok());
    }

    #[test]
    fn test_minilm_config_empty_dir_rejected() {
        let err = MiniLmConfig::default().validate().unwrap_err();
        assert!(matches!(err, EmbeddingError::InvalidConfig { .. }));
    }

    #[test]
    fn test_minilm_config_zero_dim_rejected() {
        let config = MiniLmConfig {
            embedding_dim: 0,
            ..MiniLmConfig::stub()
        };
        assert!(matches!(
            config.validate(),
            Err(EmbeddingError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_minilm_config_nonexistent_dir() {
        let config = MiniLmConfig::new("/nonexistent/minilm");
        assert!(matches!(
            config.validate(),
            Err(EmbeddingError::ModelNotFound { .. })
        ));
    }

    #[test]
    fn test_minilm_config_dir_missing_weights() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("config.json"), "{}").expect("write config");
        std::fs::write(dir.path().join("tokenizer.json"), "{}").expect("write tokenizer");

        let config = MiniLmConfig::new(dir.path());
        match config.validate() {
            Err(EmbeddingError::ModelNotFound { path }) => {
                assert!(path.ends_with("model.safetensors"));
            }
            other => panic!("expected ModelNotFound, got {:?}", other),
        }
    }
}

mod stub_tests {
    use super::*;

    #[test]
    fn test_stub_load() {
        let embedder = MiniLmEmbedder::load(MiniLmConfig::stub()).expect("stub loads");
        assert!(embedder.is_stub());
        assert_eq!(embedder.embedding_dim(), MINILM_EMBEDDING_DIM);
    }

    #[test]
    fn test_stub_embedding_dimension_and_norm() {
        let embedder = MiniLmEmbedder::stub();
        let v = embedder.embed("Risk scores range from 1 to 20").expect("embed");
        assert_eq!(v.len(), MINILM_EMBEDDING_DIM);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_stub_is_deterministic() {
        let embedder = MiniLmEmbedder::stub();
        let a = embedder.embed("same text").expect("embed");
        let b = embedder.embed("same text").expect("embed");
        assert_eq!(a, b);
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_stub_batch_matches_single() {
        let embedder = MiniLmEmbedder::stub();
        let texts = ["first sentence here", "second sentence here"];
        let batch = embedder.embed_batch(&texts).expect("batch");
        assert_eq!(batch.len(), 2);
        for (text, vector) in texts.iter().zip(batch.iter()) {
            assert_eq!(&embedder.embed(text).expect("embed"), vector);
        }
    }

    #[test]
    fn test_stub_empty_batch() {
        let embedder = MiniLmEmbedder::stub();
        assert!(embedder.embed_batch(&[]).expect("batch").is_empty());
    }

    #[test]
    fn test_debug_output() {
        let debug = format!("{:?}", MiniLmEmbedder::stub());
        assert!(debug.contains("MiniLmEmbedder"));
        assert!(debug.contains("Stub"));
    }

    #[test]
    fn test_load_without_model_files_fails() {
        let result = MiniLmEmbedder::load(MiniLmConfig::new("/nonexistent/minilm"));
        assert!(matches!(result, Err(EmbeddingError::ModelNotFound { .. })));
    }
}
