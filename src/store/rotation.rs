//! "Now playing" selection.
//!
//! The next artwork is the one shown least often; ties go to the oldest
//! `created_at`, then to list position. Bumping the winner's count after each
//! pick cycles through the whole gallery before any artwork repeats.
//!
//! The counter is the only record of exposure: there is no audit trail, and
//! picks are only linearizable because a single worker owns the store.

use super::Artwork;

/// Position of the next artwork to show, `None` for an empty gallery.
pub fn select_next(artworks: &[Artwork]) -> Option<usize> {
    artworks
        .iter()
        .enumerate()
        .min_by_key(|(i, a)| (a.display_count, a.created_at, *i))
        .map(|(i, _)| i)
}

/// Pick the next artwork and bump its display count.
pub fn advance(artworks: &mut [Artwork]) -> Option<&Artwork> {
    let i = select_next(artworks)?;
    let picked = &mut artworks[i];
    picked.display_count = picked.display_count.saturating_add(1);
    Some(picked)
}
