// self
use crate::obs::{Operation, OperationEvent};

/// Records an operation event via the global metrics recorder (when enabled).
pub fn record_operation_event(operation: Operation, event: OperationEvent) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"helpdesk_client_operation_total",
			"operation" => operation.as_str(),
			"event" => event.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (operation, event);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_operation_event_noop_without_recorder() {
		record_operation_event(Operation::ApiCall, OperationEvent::RateLimited);
	}
}
