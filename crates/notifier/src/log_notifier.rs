use async_trait::async_trait;
use log::info;
use ratecast_core::errors::Result;
use ratecast_core::notifications::{Message, NotifierTrait};
use ratecast_core::RequestContext;

/// Notifier for development setups without a mail provider.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotifierTrait for LogNotifier {
    async fn send(&self, ctx: &RequestContext, message: &Message) -> Result<()> {
        ctx.check()?;
        info!(
            "Email to {} [{}]: {}",
            message.to, message.subject, message.body
        );
        Ok(())
    }
}
