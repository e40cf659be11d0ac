use slot_buffer::{SlotBuffer, SlotError};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

struct Tracked(usize, Arc<AtomicUsize>);

impl Drop for Tracked {
    fn drop(&mut self) {
        println!("Releasing element {}", self.0);
        self.1.fetch_add(1, Ordering::SeqCst);
    }
}

fn main() -> Result<(), SlotError> {
    println!("--- Release On Reset And Drop ---");
    let released = Arc::new(AtomicUsize::new(0));

    {
        let mut slots = SlotBuffer::with_capacity(1)?;
        for i in 0..3 {
            slots.push(Tracked(i, released.clone()))?;
        }
        println!("Buffer holds 3 elements, capacity {}.", slots.capacity());

        slots.reset(1)?;
        println!("After reset: {} released, capacity {}.", released.load(Ordering::SeqCst), slots.capacity());

        slots.push(Tracked(3, released.clone()))?;
        // Scope ends here, the last element goes with the buffer.
    }

    println!("Total elements released: {}", released.load(Ordering::SeqCst));
    assert_eq!(released.load(Ordering::SeqCst), 4);
    Ok(())
}
