//! Integration tests for the Query Generator

#[cfg(test)]
mod tests {
    use crate::{
        Credentials, GeneratorConfig, GeneratorError, ParseStrategy, PromptFile, QueryGenerator,
        DEFAULT_PROMPT, OPENAI_API_KEY, OPENAI_PROMPT_ID, OPENAI_PROMPT_VERSION,
    };
    use bom_domain::{GenerationRequest, TextGenerator};
    use bom_provenance::{sha256_hex, ProvenanceLog};
    use bom_providers::MockProvider;
    use std::time::Duration;
    use tempfile::TempDir;

    fn credentials() -> Credentials {
        Credentials::default().with(OPENAI_API_KEY, "sk-test")
    }

    fn create_generator(
        dir: &TempDir,
        provider: MockProvider,
        credentials: Credentials,
        config: GeneratorConfig,
    ) -> QueryGenerator<MockProvider> {
        QueryGenerator::new(
            provider,
            ProvenanceLog::new(dir.path().join("data").join("openai_responses.jsonl")),
            PromptFile::new(dir.path().join("data").join("prompt.txt")),
            credentials,
            config,
        )
    }

    #[tokio::test]
    async fn test_full_generation_flow() {
        let dir = TempDir::new().unwrap();
        let provider = MockProvider::new("gunshot slow motion\nstarter pistol track meet\n");
        let generator =
            create_generator(&dir, provider.clone(), credentials(), GeneratorConfig::default());

        let generation = generator.generate("gpt-4.1-mini", true).await.unwrap();

        assert_eq!(generation.strategy, ParseStrategy::Lines);
        assert_eq!(
            generation.batch.queries,
            vec!["gunshot slow motion", "starter pistol track meet"]
        );
        assert_eq!(generation.batch.model, "gpt-4.1-mini");
        assert_eq!(generation.batch.prompt_id, "local");
        assert_eq!(generation.batch.prompt_sha256, sha256_hex(&generation.batch.prompt));
        assert!(generation.batch.prompt.starts_with(DEFAULT_PROMPT));

        let logged: Vec<_> = generator.log().read_all().unwrap().collect();
        assert_eq!(logged, vec![generation.batch]);
        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.requests()[0].api_key, "sk-test");
    }

    #[tokio::test]
    async fn test_missing_credential_fails_before_provider_call() {
        let dir = TempDir::new().unwrap();
        let provider = MockProvider::new("a\nb");
        let generator = create_generator(
            &dir,
            provider.clone(),
            Credentials::default(),
            GeneratorConfig::default(),
        );

        let result = generator.generate("gpt-4.1-mini", true).await;

        assert!(matches!(result, Err(GeneratorError::Configuration(_))));
        assert_eq!(provider.call_count(), 0);
        assert!(!generator.log().path().exists());
    }

    #[tokio::test]
    async fn test_provider_failure_appends_nothing() {
        let dir = TempDir::new().unwrap();
        let mut provider = MockProvider::default();
        provider.add_error(DEFAULT_PROMPT);
        let generator = create_generator(&dir, provider, credentials(), GeneratorConfig::default());

        let result = generator.generate("m", false).await;

        assert!(matches!(result, Err(GeneratorError::Provider(_))));
        assert!(!generator.log().path().exists());
    }

    #[tokio::test]
    async fn test_blank_output_is_provider_error() {
        let dir = TempDir::new().unwrap();
        let generator = create_generator(
            &dir,
            MockProvider::new("  \n "),
            credentials(),
            GeneratorConfig::default(),
        );

        let result = generator.generate("m", false).await;
        assert!(matches!(result, Err(GeneratorError::Provider(_))));
        assert!(!generator.log().path().exists());
    }

    #[tokio::test]
    async fn test_empty_json_array_is_provider_error() {
        let dir = TempDir::new().unwrap();
        let generator = create_generator(
            &dir,
            MockProvider::new("[]"),
            credentials(),
            GeneratorConfig::default(),
        );

        let result = generator.generate("m", false).await;
        assert!(matches!(result, Err(GeneratorError::Provider(_))));
        assert!(!generator.log().path().exists());
    }

    #[tokio::test]
    async fn test_degraded_parse_is_still_logged() {
        let dir = TempDir::new().unwrap();
        let generator = create_generator(
            &dir,
            MockProvider::new("fireworks close, blank round indoor"),
            credentials(),
            GeneratorConfig::default(),
        );

        let generation = generator.generate("m", false).await.unwrap();

        assert!(generation.strategy.is_degraded());
        assert_eq!(generator.log().read_all().unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_previous_queries_are_folded_into_next_prompt() {
        let dir = TempDir::new().unwrap();
        let provider = MockProvider::new("first query\nsecond query");
        let generator =
            create_generator(&dir, provider.clone(), credentials(), GeneratorConfig::default());

        generator.generate("m", true).await.unwrap();
        generator.generate("m", true).await.unwrap();

        let requests = provider.requests();
        assert!(!requests[0].input.contains("Previously suggested"));
        assert!(requests[1].input.ends_with(
            "Previously suggested queries (do not repeat):\n- second query\n- first query"
        ));
        assert_eq!(generator.log().read_all().unwrap().count(), 2);
    }

    #[tokio::test]
    async fn test_include_previous_false_skips_history() {
        let dir = TempDir::new().unwrap();
        let provider = MockProvider::new("a\nb");
        let generator =
            create_generator(&dir, provider.clone(), credentials(), GeneratorConfig::default());

        generator.generate("m", false).await.unwrap();
        generator.generate("m", false).await.unwrap();

        assert_eq!(provider.requests()[1].input, DEFAULT_PROMPT);
    }

    #[tokio::test]
    async fn test_recent_limit_bounds_context() {
        let dir = TempDir::new().unwrap();
        let provider = MockProvider::new("q1\nq2\nq3\nq4");
        let config = GeneratorConfig {
            recent_limit: 2,
            ..GeneratorConfig::default()
        };
        let generator = create_generator(&dir, provider.clone(), credentials(), config);

        generator.generate("m", true).await.unwrap();
        generator.generate("m", true).await.unwrap();

        let input = &provider.requests()[1].input;
        assert!(input.contains("- q4\n- q3"));
        assert!(!input.contains("- q2"));
    }

    #[tokio::test]
    async fn test_hosted_prompt_without_base_instructions() {
        let dir = TempDir::new().unwrap();
        let provider = MockProvider::new("a\nb");
        let creds = credentials()
            .with(OPENAI_PROMPT_ID, "pmpt_42")
            .with(OPENAI_PROMPT_VERSION, "7");
        let config = GeneratorConfig {
            include_base_instructions: false,
            ..GeneratorConfig::default()
        };
        let generator = create_generator(&dir, provider.clone(), creds, config);

        let generation = generator.generate("m", false).await.unwrap();

        let request = &provider.requests()[0];
        let prompt = request.prompt.as_ref().unwrap();
        assert_eq!(prompt.id, "pmpt_42");
        assert_eq!(prompt.version.as_deref(), Some("7"));
        assert!(!request.input.contains(DEFAULT_PROMPT));
        assert_eq!(generation.batch.prompt_id, "pmpt_42");
        assert_eq!(generation.batch.prompt_version.as_deref(), Some("7"));
    }

    #[tokio::test]
    async fn test_hosted_prompt_with_base_instructions() {
        let dir = TempDir::new().unwrap();
        let provider = MockProvider::new("a\nb");
        let creds = credentials().with(OPENAI_PROMPT_ID, "pmpt_42");
        let generator =
            create_generator(&dir, provider.clone(), creds, GeneratorConfig::default());

        generator.generate("m", false).await.unwrap();

        let request = &provider.requests()[0];
        assert!(request.prompt.is_some());
        assert_eq!(request.input, DEFAULT_PROMPT);
    }

    struct SlowProvider;

    impl TextGenerator for SlowProvider {
        type Error = std::io::Error;

        fn generate(&self, _request: &GenerationRequest) -> Result<String, Self::Error> {
            std::thread::sleep(Duration::from_millis(1500));
            Ok("late\nqueries".to_string())
        }
    }

    #[tokio::test]
    async fn test_timeout_is_provider_error() {
        let dir = TempDir::new().unwrap();
        let config = GeneratorConfig {
            generation_timeout_secs: 1,
            ..GeneratorConfig::default()
        };
        let generator = QueryGenerator::new(
            SlowProvider,
            ProvenanceLog::new(dir.path().join("log.jsonl")),
            PromptFile::new(dir.path().join("prompt.txt")),
            credentials(),
            config,
        );

        let result = generator.generate("m", false).await;

        assert!(matches!(result, Err(GeneratorError::Provider(_))));
        assert!(!generator.log().path().exists());
    }
}
