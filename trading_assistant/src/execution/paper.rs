use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use super::{ExecutionError, ExecutionReport, OrderExecutor, validate_intent};
use crate::decision::OrderIntent;

/// Simulated broker: accepts every valid intent and remembers it.
#[derive(Debug, Default)]
pub struct PaperExecutor {
    submitted: Mutex<Vec<OrderIntent>>,
}

impl PaperExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intents accepted so far, oldest first.
    pub fn submitted(&self) -> Vec<OrderIntent> {
        self.submitted
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

#[async_trait]
impl OrderExecutor for PaperExecutor {
    fn name(&self) -> &'static str {
        "paper"
    }

    async fn submit(&self, intent: &OrderIntent) -> Result<ExecutionReport, ExecutionError> {
        validate_intent(intent)?;

        let order_id = format!("paper-{}", Uuid::new_v4());
        tracing::info!(
            order_id = %order_id,
            symbol = %intent.symbol,
            side = ?intent.side,
            volume = intent.volume,
            stop_loss = intent.stop_loss,
            take_profit = intent.take_profit,
            "paper order filled"
        );

        match self.submitted.lock() {
            Ok(mut guard) => guard.push(intent.clone()),
            Err(poisoned) => poisoned.into_inner().push(intent.clone()),
        }

        Ok(ExecutionReport {
            success: true,
            broker_order_id: Some(order_id),
        })
    }
}
