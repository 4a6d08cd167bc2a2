use super::Runnable;
use crate::Result;
use async_trait::async_trait;
use std::marker::PhantomData;

/// Adapts a synchronous closure into a chain stage.
pub struct RunnableLambda<F, I, O> {
    name: String,
    func: F,
    _marker: PhantomData<fn(I) -> O>,
}

impl<F, I, O> RunnableLambda<F, I, O>
where
    F: Fn(I) -> Result<O> + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<F, I, O> Runnable for RunnableLambda<F, I, O>
where
    F: Fn(I) -> Result<O> + Send + Sync,
    I: Send + 'static,
    O: Send + 'static,
{
    type Input = I;
    type Output = O;

    fn name(&self) -> String {
        self.name.clone()
    }

    async fn invoke(&self, input: I) -> Result<O> {
        (self.func)(input)
    }
}
