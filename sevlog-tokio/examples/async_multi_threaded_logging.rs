use sevlog_tokio::{TaskContext, main_logger, new_transaction_id};

#[tokio::main]
async fn main() {
    let main = main_logger();
    main.info(["Hello, world from main task!"]);
    let handles: Vec<_> = (0..5)
        .map(|i| {
            tokio::spawn(TaskContext::scope_transaction(new_transaction_id(), async move {
                let logger = main_logger().create(&format!("task {i}"));
                logger.info(["request accepted"]);
                tokio::task::yield_now().await;
                logger.warning(["request took", "too long"]);
            }))
        })
        .collect();
    for h in handles {
        h.await.unwrap();
    }
}
