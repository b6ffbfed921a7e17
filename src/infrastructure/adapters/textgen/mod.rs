//! TextGen Adapters - 外部文本生成服务适配器

mod fake_client;
mod http_client;

pub use fake_client::FakeTextGenClient;
pub use http_client::{HttpTextGenClient, HttpTextGenClientConfig};
