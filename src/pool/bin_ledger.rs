use crate::error::StateError;
use crate::pool::bin::Bin;

/// Non-empty bins sorted by strictly increasing id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BinLedger {
    bins: Vec<Bin>,
}

impl BinLedger {
    /// Builds a ledger from bins in any order.
    ///
    /// Empty bins are dropped; a repeated id fails with
    /// `StateError::DuplicateBin`.
    pub fn from_bins(bins: impl IntoIterator<Item = Bin>) -> Result<Self, StateError> {
        let mut bins: Vec<Bin> = bins.into_iter().filter(|bin| !bin.is_empty()).collect();
        bins.sort_unstable_by_key(|bin| bin.id);

        if let Some(pair) = bins.windows(2).find(|pair| pair[0].id == pair[1].id) {
            return Err(StateError::DuplicateBin(pair[0].id));
        }

        Ok(Self { bins })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Bin> {
        self.bins.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Bin] {
        &self.bins
    }

    /// Position of bin `id`, or `StateError::BinNotFound`.
    #[inline]
    pub fn find_index(&self, id: u32) -> Result<usize, StateError> {
        self.bins
            .binary_search_by_key(&id, |bin| bin.id)
            .map_err(|_| StateError::BinNotFound(id))
    }

    #[inline]
    pub fn get(&self, id: u32) -> Option<&Bin> {
        self.find_index(id).ok().map(|index| &self.bins[index])
    }

    /// Id of the neighbour of bin `id` in the swap direction.
    ///
    /// Selling X (`swap_for_y`) consumes the Y sitting at and below the
    /// active price, so the walk goes to the next lower id; selling Y goes
    /// to the next higher id. Fails with `StateError::BinNotFound` when
    /// `id` is absent or has no neighbour on that side.
    pub fn next_non_empty_bin(&self, swap_for_y: bool, id: u32) -> Result<u32, StateError> {
        let index = self.find_index(id)?;

        let next = if swap_for_y {
            index.checked_sub(1)
        } else {
            index.checked_add(1).filter(|next| *next < self.bins.len())
        };

        next.map(|next| self.bins[next].id)
            .ok_or(StateError::BinNotFound(id))
    }

    #[inline]
    pub(crate) fn bins_mut(&mut self) -> &mut Vec<Bin> {
        &mut self.bins
    }
}

impl<'a> IntoIterator for &'a BinLedger {
    type Item = &'a Bin;
    type IntoIter = std::slice::Iter<'a, Bin>;

    fn into_iter(self) -> Self::IntoIter {
        self.bins.iter()
    }
}
