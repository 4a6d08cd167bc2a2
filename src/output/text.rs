use crate::runnable::Runnable;
use crate::types::Message;
use crate::Result;
use async_trait::async_trait;

/// Returns the content of the model reply.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrOutputParser;

impl StrOutputParser {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Runnable for StrOutputParser {
    type Input = Message;
    type Output = String;

    async fn invoke(&self, input: Message) -> Result<String> {
        Ok(input.content)
    }
}
