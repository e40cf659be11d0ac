use slot_buffer::{SlotBuffer, SlotError};

fn main() -> Result<(), SlotError> {
    println!("--- Slot Buffer Growth ---");
    let mut slots = SlotBuffer::with_capacity(1)?;

    for i in 1..=5 {
        slots.push(format!("STRING{}", i))?;
        println!("Pushed STRING{}, len: {}, cap: {}", i, slots.len(), slots.capacity());
    }

    slots.insert(0, String::from("STRING0"))?;
    println!("Elements: {:?}", &slots[..]);

    while !slots.is_empty() {
        let val = slots.remove(slots.len() - 1)?;
        println!("Removed: {}, len: {}", val, slots.len());
    }
    Ok(())
}
