mod pod_parser;

pub use self::pod_parser::*;

pub trait InternalEvent: Sized {
    fn emit(self);
}

pub fn emit(event: impl InternalEvent) {
    event.emit();
}

#[macro_export]
macro_rules! emit {
    ($event:expr) => {
        $crate::internal_events::emit($event)
    };
}
