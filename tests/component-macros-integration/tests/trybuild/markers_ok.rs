use component_macros::{scoped, singleton, transient};

trait Clock {
    fn now(&self) -> u64;
}

#[singleton]
#[derive(Debug, Default)]
struct SystemClock {
    offset: u64,
}

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        self.offset
    }
}

#[scoped]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start = 1,
    Stop = 2,
}

#[transient]
struct Buffer<T: Clone>
where
    T: Default,
{
    items: Vec<T>,
}

fn main() {
    let clock: Box<dyn Clock> = Box::new(SystemClock { offset: 3 });
    assert_eq!(clock.now(), 3);
    assert_eq!(Phase::Stop as u8, 2);

    let buffer = Buffer::<u8> { items: vec![u8::default()] };
    assert_eq!(buffer.items.len(), 1);
}
