/// Narrow interface to the feedback-recording collaborator. Persistence
/// lives outside this service; the shipped sink only acknowledges receipt
/// in the logs.
pub trait FeedbackSink: Send + Sync {
    fn record(&self, label: Option<&str>);
}

pub struct LoggingFeedbackSink;

impl FeedbackSink for LoggingFeedbackSink {
    fn record(&self, label: Option<&str>) {
        match label {
            Some(label) => log::info!("Feedback received for class {:?}", label),
            None => log::info!("Feedback received without a class label"),
        }
    }
}
