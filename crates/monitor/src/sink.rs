use async_trait::async_trait;

/// Operator-facing diagnostic channel, such as stdout or an IRC query window.
#[async_trait]
pub trait OperatorSink: Send + Sync {
    /// Show one line to the operator.
    async fn put(&self, line: &str);
}
