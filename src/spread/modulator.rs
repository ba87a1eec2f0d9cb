use crate::io::Bit;
use crate::spread::ChipTable;

/// Lazily maps message bits to BOC(1,1) chip sequences, one per bit.
pub struct Spreader<'a, I> {
    table: &'a ChipTable,
    bits: I,
}

impl<'a, I> Iterator for Spreader<'a, I>
where
    I: Iterator<Item = Bit>,
{
    type Item = &'a [f64];

    fn next(&mut self) -> Option<Self::Item> {
        let bit = self.bits.next()?;
        Some(self.table.lookup(bit, true))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.bits.size_hint()
    }
}

impl<'a, I> ExactSizeIterator for Spreader<'a, I> where
    I: ExactSizeIterator<Item = Bit>
{
}

pub fn spread<I>(table: &ChipTable, bits: I) -> Spreader<'_, I::IntoIter>
where
    I: IntoIterator<Item = Bit>,
{
    Spreader {
        table,
        bits: bits.into_iter(),
    }
}

impl<'a, I> Spreader<'a, I>
where
    I: Iterator<Item = Bit>,
{
    /// Flattened chip stream.
    pub fn chips(self) -> impl Iterator<Item = f64> {
        self.flat_map(|sequence| sequence.iter().copied())
    }
}
