use super::stream::{StreamError, StreamInput, StreamOutput};

/// A value with a binary wire form.
///
/// `read_from` fills an existing (usually default) value in place, so a
/// reader can allocate first and populate afterwards.
pub trait Writeable {
    fn write_to(&self, out: &mut dyn StreamOutput) -> Result<(), StreamError>;

    fn read_from(&mut self, input: &mut dyn StreamInput) -> Result<(), StreamError>;
}

/// vint count followed by each item.
pub fn write_list<T: Writeable>(out: &mut dyn StreamOutput, items: &[T]) -> Result<(), StreamError> {
    out.write_len(items.len())?;
    for item in items {
        item.write_to(out)?;
    }
    Ok(())
}

pub fn read_list<T: Writeable + Default>(input: &mut dyn StreamInput) -> Result<Vec<T>, StreamError> {
    let len = input.read_vint()? as usize;
    let mut items = Vec::with_capacity(len.min(1024));
    for _ in 0..len {
        let mut item = T::default();
        item.read_from(input)?;
        items.push(item);
    }
    Ok(items)
}
