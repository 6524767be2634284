//! Media resolution
//!
//! Turns a [`Selection`] into one playable item. The title is fuzzy-matched
//! first, then a fixed sequence of narrowing steps runs over a working value:
//! title lookup, season and episode, season, on deck, unwatched, latest,
//! album track or audiobook resume, then collapse to a single leaf.

use crate::error::ResolveError;
use crate::library::{LibraryIndex, LibraryKind};
use crate::media::{sort_by_recency, Album, Media, Track};
use crate::providers::LibraryProvider;
use crate::selection::Selection;
use crate::utils::fuzzy::{fuzzy, Scorer};
use serde::Serialize;
use tracing::debug;

/// Best title for the media phrase and the library it came from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TitleMatch {
    pub title: Option<String>,
    pub library: Option<LibraryKind>,
    pub score: u8,
}

/// Order libraries are searched when the command names none.
/// Earlier entries win ties.
const SEARCH_ORDER: [LibraryKind; 4] = [
    LibraryKind::Shows,
    LibraryKind::Movies,
    LibraryKind::Albums,
    LibraryKind::Tracks,
];

/// Fuzzy-resolve the selection's media phrase to a library title
pub fn find_title(selection: &Selection, index: &LibraryIndex) -> TitleMatch {
    let media = selection.media.as_deref().filter(|m| !m.is_empty());

    let (library, best) = match (selection.library, media) {
        (Some(kind), Some(media)) => (Some(kind), fuzzy(media, index.section(kind).titles(), Scorer::Weighted)),
        (Some(kind), None) => return TitleMatch { library: Some(kind), ..Default::default() },
        (None, Some(media)) => {
            let mut library = SEARCH_ORDER[0];
            let mut best = fuzzy(media, index.section(library).titles(), Scorer::Weighted);
            for kind in &SEARCH_ORDER[1..] {
                let candidate = fuzzy(media, index.section(*kind).titles(), Scorer::Weighted);
                if candidate.score > best.score {
                    library = *kind;
                    best = candidate;
                }
            }
            (Some(library), best)
        }
        (None, None) => return TitleMatch::default(),
    };

    debug!("🔎 Title match: '{}' ({}) in {:?}", best.value, best.score, library);
    TitleMatch {
        title: (!best.value.is_empty()).then_some(best.value),
        library,
        score: best.score,
    }
}

/// Value being narrowed by the resolution steps
#[derive(Debug)]
enum Working {
    Empty,
    One(Media),
    Many(Vec<Media>),
}

impl Working {
    fn is_empty(&self) -> bool {
        match self {
            Working::Empty => true,
            Working::Many(items) => items.is_empty(),
            Working::One(_) => false,
        }
    }

    /// Items to filter: a list as is, a single item's playable children
    fn into_items(self) -> Vec<Media> {
        match self {
            Working::Empty => Vec::new(),
            Working::One(media) => media.into_leaves(),
            Working::Many(items) => items,
        }
    }
}

fn provider_error(err: anyhow::Error) -> ResolveError {
    ResolveError::Provider(err.to_string())
}

/// True if an on-deck entry belongs to the requested item
fn on_deck_matches(entry: &Media, item: &Media) -> bool {
    let same_movie = matches!(entry, Media::Movie(_)) && entry.title() == item.title();
    let of_show = entry.show_title() == Some(item.title());
    let same_show = item.show_title().is_some() && entry.show_title() == item.show_title();
    same_movie || of_show || same_show
}

fn first_episode(media: Media) -> Result<Media, ResolveError> {
    let title = media.title().to_string();
    media
        .episodes()
        .into_iter()
        .next()
        .map(Media::Episode)
        .ok_or(ResolveError::NoPlayable(title))
}

fn last_episode(media: Media) -> Result<Media, ResolveError> {
    let title = media.title().to_string();
    media
        .episodes()
        .pop()
        .map(Media::Episode)
        .ok_or(ResolveError::NoPlayable(title))
}

/// Requested track, else the resume point of an audiobook
fn album_track(album: &Album, track: Option<u32>) -> Result<Option<Track>, ResolveError> {
    let with_album = |t: &Track| Track {
        album_title: t.album_title.clone().or_else(|| Some(album.info.title.clone())),
        ..t.clone()
    };

    if let Some(number) = track {
        let position = usize::try_from(number)
            .ok()
            .and_then(|n| n.checked_sub(1))
            .ok_or(ResolveError::TrackNotFound(number))?;
        return album
            .tracks
            .get(position)
            .map(|t| Some(with_album(t)))
            .ok_or(ResolveError::TrackNotFound(number));
    }

    if !album.is_audiobook() {
        return Ok(None);
    }

    let min_count = album
        .tracks
        .iter()
        .map(|t| t.info.view_count)
        .min()
        .ok_or_else(|| ResolveError::NoPlayable(album.info.title.clone()))?;
    let least_played = || album.tracks.iter().filter(|t| t.info.view_count == min_count);

    let resume = least_played()
        .find(|t| t.info.view_offset > 0)
        .or_else(|| least_played().next());
    debug!("📖 Audiobook resume: {:?}", resume.map(|t| &t.info.title));
    Ok(resume.map(with_album))
}

/// Runs the narrowing steps against a library provider
pub struct MediaResolver<'a> {
    provider: &'a dyn LibraryProvider,
}

impl<'a> MediaResolver<'a> {
    pub fn new(provider: &'a dyn LibraryProvider) -> Self {
        Self { provider }
    }

    pub fn resolve(
        &self,
        selection: &Selection,
        found: &TitleMatch,
        index: &LibraryIndex,
    ) -> Result<Media, ResolveError> {
        let library: &[Media] = found
            .library
            .map(|kind| index.section(kind).media())
            .unwrap_or_default();

        let mut working = match found.title.as_deref() {
            Some(title) if !library.is_empty() => {
                let entity = library
                    .iter()
                    .find(|m| m.title() == title)
                    .cloned()
                    .ok_or_else(|| ResolveError::EntityNotFound { title: title.to_string() })?;
                Working::One(entity)
            }
            _ => Working::Empty,
        };

        if let (Some(season), Some(episode)) = (selection.season, selection.episode) {
            let not_found = ResolveError::EpisodeNotFound { season, episode };
            return match working {
                Working::One(Media::Show(show)) => show
                    .episode(season, episode)
                    .cloned()
                    .map(Media::Episode)
                    .ok_or(not_found),
                _ => Err(not_found),
            };
        }

        if let Some(season) = selection.season {
            working = match working {
                Working::One(Media::Show(show)) => show
                    .season(season)
                    .cloned()
                    .map(|s| Working::One(Media::Season(s)))
                    .ok_or(ResolveError::SeasonNotFound(season))?,
                _ => return Err(ResolveError::SeasonNotFound(season)),
            };
        }

        if selection.ondeck {
            let mut deck = self.on_deck(selection, &working, index)?;
            deck.reverse();
            debug!("On deck: {} items", deck.len());
            working = Working::Many(deck);
        }

        if selection.unwatched {
            let source = if !working.is_empty() {
                working.into_items()
            } else if !library.is_empty() {
                library.to_vec()
            } else {
                self.provider.recently_added().map_err(provider_error)?
            };
            let mut unwatched: Vec<Media> = source.into_iter().filter(|m| !m.is_watched()).collect();
            sort_by_recency(&mut unwatched);
            debug!("Unwatched: {} items", unwatched.len());
            working = Working::Many(unwatched);
        }

        if selection.latest {
            if !selection.unwatched {
                if working.is_empty() {
                    let source = if library.is_empty() {
                        self.provider.recently_added().map_err(provider_error)?
                    } else {
                        library.to_vec()
                    };
                    working = Working::Many(source);
                }
                if let Working::Many(items) = &mut working {
                    sort_by_recency(items);
                }
            }
            if let Working::Many(items) = working {
                working = Working::One(items.into_iter().last().ok_or(ResolveError::Empty)?);
            }
            if let Working::One(media @ (Media::Show(_) | Media::Season(_))) = working {
                working = Working::One(last_episode(media)?);
            }
        }

        if let Working::One(Media::Album(album)) = &working {
            if let Some(track) = album_track(album, selection.track)? {
                working = Working::One(Media::Track(track));
            }
        }

        let media = match working {
            Working::One(media) => media,
            Working::Many(items) => items.into_iter().next().ok_or(ResolveError::Empty)?,
            Working::Empty => return Err(ResolveError::Empty),
        };

        match media {
            Media::Show(_) | Media::Season(_) => first_episode(media),
            leaf => Ok(leaf),
        }
    }

    /// On-deck entries for the requested item, the named library, or everything
    fn on_deck(&self, selection: &Selection, working: &Working, index: &LibraryIndex) -> Result<Vec<Media>, ResolveError> {
        let has_media = selection.media.as_deref().is_some_and(|m| !m.is_empty());

        if has_media {
            let deck = self.provider.on_deck(None).map_err(provider_error)?;
            return Ok(match working {
                Working::One(item) => deck.into_iter().filter(|e| on_deck_matches(e, item)).collect(),
                _ => Vec::new(),
            });
        }

        if let Some(kind) = selection.library {
            return match index.section(kind).media().first() {
                Some(first) => self.provider.on_deck(first.info().section_id).map_err(provider_error),
                None => Ok(Vec::new()),
            };
        }

        self.provider.on_deck(None).map_err(provider_error)
    }
}
