pub mod helpers;
pub mod mock_builder;
pub mod mock_source;
pub mod mock_transport;

pub use helpers::*;
pub use mock_builder::MockPaymentBuilder;
pub use mock_source::MockRecordSource;
pub use mock_transport::{MockTransport, RecordedCall};
