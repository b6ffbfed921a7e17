//! Fake TextGen Client - 用于测试的生成客户端
//!
//! 按脚本顺序返回预设结果，不实际调用生成服务；
//! 记录每次调用收到的上下文，供测试断言提示词内容

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::application::ports::{CompletionRequest, CompletionResponse, TextGenError, TextGenPort};

/// Fake TextGen Client
pub struct FakeTextGenClient {
    /// 预设响应队列，Err(msg) 映射为 ServiceError
    responses: Mutex<VecDeque<Result<String, String>>>,
    /// 收到的上下文记录
    contexts: Mutex<Vec<String>>,
    /// 调用计数
    calls: AtomicUsize,
    /// 模拟推理延迟（毫秒）
    delay_ms: u64,
}

impl FakeTextGenClient {
    /// 创建带预设响应脚本的客户端
    pub fn with_responses(responses: Vec<Result<String, String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            contexts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            delay_ms: 0,
        }
    }

    /// 设置模拟延迟
    pub fn with_delay_ms(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// 已发生的调用次数
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 到目前为止收到的全部上下文
    pub fn contexts(&self) -> Vec<String> {
        self.contexts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenPort for FakeTextGenClient {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, TextGenError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.contexts.lock().unwrap().push(request.context);

        if self.delay_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.delay_ms)).await;
        }

        let scripted = self.responses.lock().unwrap().pop_front();
        match scripted {
            Some(Ok(text)) => Ok(CompletionResponse { text }),
            Some(Err(message)) => Err(TextGenError::ServiceError(message)),
            None => Err(TextGenError::ServiceError(
                "fake client: no scripted response left".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_responses_in_order() {
        let client = FakeTextGenClient::with_responses(vec![
            Ok("one".to_string()),
            Err("boom".to_string()),
        ]);

        let first = client
            .complete(CompletionRequest {
                context: "ctx-1".to_string(),
            })
            .await;
        assert_eq!(first.unwrap().text, "one");

        let second = client
            .complete(CompletionRequest {
                context: "ctx-2".to_string(),
            })
            .await;
        assert!(matches!(second, Err(TextGenError::ServiceError(_))));

        assert_eq!(client.call_count(), 2);
        assert_eq!(client.contexts(), vec!["ctx-1", "ctx-2"]);
    }
}
