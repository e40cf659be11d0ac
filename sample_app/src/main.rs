use string_array::{ArrayError, StringArray};

fn main() -> Result<(), ArrayError> {
    println!("Initializing StringArray...");
    let mut array = StringArray::new(1)?;

    println!("Appending elements...");
    for i in 0..10 {
        array.append(&format!("item{}", i))?;
    }

    assert_eq!(array.len(), 10);
    assert_eq!(array.capacity(), 16);
    println!("Array length verified: {} (capacity {})", array.len(), array.capacity());

    println!("Iterating elements:");
    for (i, val) in array.iter().enumerate() {
        println!("Index {}: {}", i, val);
        assert_eq!(val, format!("item{}", i));
    }

    println!("Popping elements...");
    while !array.is_empty() {
        let val = array.pop(-1)?;
        print!("{} ", val);
    }
    println!("\nAll elements popped.");

    assert_eq!(array.to_string(), "[]");
    assert!(array.pop(-1).is_err());
    println!("Integration test passed successfully.");
    Ok(())
}
