use anyhow::Result;
use std::time::Duration;
use tokio::time::sleep;

/// 行情请求的指数退避重试：1s、2s、4s……
///
/// 只重试瞬态错误（超时/连接中断/5xx），4xx 一类的客户端错误立即返回，
/// 重试无意义还会拖慢整批快照。`max_retries` 不含首次请求。
pub async fn retry_with_backoff<F, Fut, T>(max_retries: u32, operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        let err = match operation().await {
            Ok(val) => return Ok(val),
            Err(e) => e,
        };

        if attempt >= max_retries || !is_transient(&err) {
            return Err(err);
        }

        let delay = Duration::from_secs(1 << attempt);
        log::warn!(
            "行情请求失败（第 {} 次），{}s 后重试: {}",
            attempt + 1,
            delay.as_secs(),
            err
        );
        sleep(delay).await;
        attempt += 1;
    }
}

/// 从错误文本粗判是否瞬态：reqwest 的超时/连接类错误没有稳定的类型区分
fn is_transient(err: &anyhow::Error) -> bool {
    let msg = err.to_string().to_lowercase();
    ["timeout", "timed out", "connection", "reset by peer", "server error", "502", "503", "504"]
        .iter()
        .any(|k| msg.contains(k))
}
