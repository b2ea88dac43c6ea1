use std::sync::mpsc::channel;

use sevlog::{Loggable, ThreadContext, main_logger, new_transaction_id};

fn main() {
    let main = main_logger();
    main.set_level("info").expect("info is a known level");
    main.info(["Hello, world!"]);
    // each worker tags its lines with the id of the request it is handling
    let (handles, senders): (Vec<_>, Vec<_>) = (0..5)
        .map(|i| {
            let (sender, receiver) = channel::<&'static str>();
            (
                std::thread::spawn(move || {
                    let logger = main_logger().create(&format!("thread {i}"));
                    for message in receiver {
                        ThreadContext::scope_transaction(new_transaction_id(), || {
                            logger.debug(["never shown, main level is info"]);
                            sevlog::warning!(logger, "MESSAGE RECEIVED:", message, i);
                        });
                    }
                }),
                sender,
            )
        })
        .collect();
    for sender in senders {
        sender.send("Hello, world!").unwrap();
    }
    for handle in handles {
        handle.join().unwrap();
    }
    let err = std::io::Error::other("worker pool drained");
    main.create("pool").error([Loggable::error(&err)]);
}
