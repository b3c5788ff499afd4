#![warn(clippy::all, rust_2018_idioms)]

pub mod backend;
pub mod event;
pub mod frontend;
pub mod string_error;

pub const BACKEND_HUNG_UP_MSG: &str = "backend event loop hung up";

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use log::trace;

    use crate::backend::{request_stop, BackendEventLoop, BackendLink, BackendState};
    use crate::frontend::UIParameter;

    struct TestState {
        counter: usize,
    }
    impl BackendState for TestState {}

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_cancel_request_working() {
        init();

        let (request_tx, request_rx) = std::sync::mpsc::channel();
        let backend_state = TestState { counter: 0 };
        let eventloop_handle = BackendEventLoop::new(request_rx, backend_state).run();

        let tic = Instant::now();

        let (rx, linker) = BackendLink::new("test", |_: &mut BackendEventLoop<TestState>| {
            std::thread::sleep(Duration::from_millis(1000));
        });

        // dropping rx should make the request invalid, such that the backend
        // action (waiting for 1 s) is not executed ...
        drop(rx);
        trace!("drop of receiver done");
        assert!(linker.is_cancelled());
        request_tx.send(Box::new(linker)).unwrap();
        request_stop(&request_tx, eventloop_handle);
        let delta_time = (Instant::now() - tic).as_millis();
        // ... thus this whole process here should take much less than 1 s
        assert!(delta_time < 500);
    }

    #[test]
    fn test_request_result_reaches_ui_parameter() {
        init();

        let (request_tx, request_rx) = std::sync::mpsc::channel();
        let eventloop_handle =
            BackendEventLoop::new(request_rx, TestState { counter: 41 }).run();

        let (rx, linker) = BackendLink::new("increment", |b: &mut BackendEventLoop<TestState>| {
            b.state.counter += 1;
            b.state.counter
        });
        let mut param = UIParameter::new(0);
        param.set_recv(rx);
        assert!(!param.is_up_to_date());
        request_tx.send(Box::new(linker)).unwrap();

        let tic = Instant::now();
        while !param.try_update() {
            assert!(tic.elapsed() < Duration::from_secs(5));
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(param.is_up_to_date());
        assert_eq!(*param.value(), 42);

        request_stop(&request_tx, eventloop_handle);
    }
}
