use super::Runnable;
use crate::Result;
use async_trait::async_trait;
use std::time::Instant;
use tracing::debug;

/// Two runnables run back to back. Nest sequences for longer chains.
pub struct RunnableSequence<A, B> {
    first: A,
    second: B,
}

impl<A, B> RunnableSequence<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

async fn run_step<R: Runnable + ?Sized>(step: &R, input: R::Input) -> Result<R::Output> {
    let name = step.name();
    let start = Instant::now();
    debug!(step = %name, "chain step started");
    match step.invoke(input).await {
        Ok(out) => {
            debug!(
                step = %name,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "chain step finished"
            );
            Ok(out)
        }
        Err(e) => {
            debug!(step = %name, error = %e, "chain step failed");
            Err(e)
        }
    }
}

#[async_trait]
impl<A, B> Runnable for RunnableSequence<A, B>
where
    A: Runnable,
    B: Runnable<Input = A::Output>,
{
    type Input = A::Input;
    type Output = B::Output;

    fn name(&self) -> String {
        format!("{} | {}", self.first.name(), self.second.name())
    }

    async fn invoke(&self, input: A::Input) -> Result<B::Output> {
        let mid = run_step(&self.first, input).await?;
        run_step(&self.second, mid).await
    }
}

#[cfg(test)]
mod tests {
    use crate::runnable::{Runnable, RunnableExt, RunnableLambda};
    use crate::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_three_stage_pipe() {
        let chain = RunnableLambda::new("parse", |s: String| {
            s.trim()
                .parse::<i64>()
                .map_err(|e| Error::template(e.to_string()))
        })
        .pipe(RunnableLambda::new("square", |x: i64| Ok(x * x)))
        .pipe(RunnableLambda::new("render", |x: i64| Ok(format!("={}", x))));

        assert_eq!(chain.name(), "parse | square | render");
        assert_eq!(chain.invoke(" 7 ".to_string()).await.unwrap(), "=49");
    }

    #[tokio::test]
    async fn test_failure_stops_the_chain() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let chain = RunnableLambda::new("fail", |_: ()| -> crate::Result<u8> {
            Err(Error::template("boom"))
        })
        .pipe(RunnableLambda::new("after", move |x: u8| {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(x)
        }));

        assert!(chain.invoke(()).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
