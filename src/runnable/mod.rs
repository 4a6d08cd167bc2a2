//! Composable runnables.
//!
//! Every stage of a chain (prompt template, chat model, output parser, or a plain
//! closure) implements [`Runnable`]. Stages are joined with [`RunnableExt::pipe`],
//! which type-checks that the output of one stage is the input of the next:
//!
//! ```text
//! PromptTemplate ──► ChatModel ──► StrOutputParser
//!  Value → PromptValue   PromptValue → Message   Message → String
//! ```
//!
//! ```rust
//! use promptchain::runnable::{Runnable, RunnableExt, RunnableLambda};
//!
//! # tokio_test_block_on(async {
//! let double = RunnableLambda::new("double", |x: i64| Ok(x * 2));
//! let show = RunnableLambda::new("show", |x: i64| Ok(format!("got {}", x)));
//! let chain = double.pipe(show);
//! assert_eq!(chain.invoke(21).await.unwrap(), "got 42");
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f)
//! # }
//! ```

mod lambda;
mod sequence;

pub use lambda::RunnableLambda;
pub use sequence::RunnableSequence;

use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// A unit of work with a typed input and output.
#[async_trait]
pub trait Runnable: Send + Sync {
    type Input: Send + 'static;
    type Output: Send + 'static;

    /// Name used in debug traces.
    fn name(&self) -> String {
        short_type_name(std::any::type_name::<Self>())
    }

    async fn invoke(&self, input: Self::Input) -> Result<Self::Output>;
}

#[async_trait]
impl<R> Runnable for Arc<R>
where
    R: Runnable + ?Sized,
{
    type Input = R::Input;
    type Output = R::Output;

    fn name(&self) -> String {
        (**self).name()
    }

    async fn invoke(&self, input: Self::Input) -> Result<Self::Output> {
        (**self).invoke(input).await
    }
}

/// Combinators available on every runnable.
pub trait RunnableExt: Runnable + Sized {
    /// `self | next`: feed this runnable's output into `next`.
    fn pipe<B>(self, next: B) -> RunnableSequence<Self, B>
    where
        B: Runnable<Input = Self::Output>,
    {
        RunnableSequence::new(self, next)
    }
}

impl<R: Runnable> RunnableExt for R {}

/// `promptchain::prompt::PromptTemplate` -> `PromptTemplate`, generics kept.
fn short_type_name(full: &str) -> String {
    let (base, generics) = match full.find('<') {
        Some(idx) => full.split_at(idx),
        None => (full, ""),
    };
    let base = base.rsplit("::").next().unwrap_or(base);
    format!("{}{}", base, generics)
}
