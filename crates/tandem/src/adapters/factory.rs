use anyhow::Result;

use super::anthropic::AnthropicAdapter;
use super::base::ModelAdapter;
use super::configs::AdapterConfig;
use super::openai::OpenAiAdapter;

pub fn get_adapter(config: AdapterConfig) -> Result<Box<dyn ModelAdapter>> {
    match config {
        AdapterConfig::Anthropic(anthropic_config) => {
            Ok(Box::new(AnthropicAdapter::new(anthropic_config)?))
        }
        AdapterConfig::OpenAi(openai_config) => Ok(Box::new(OpenAiAdapter::new(openai_config)?)),
    }
}
