//! Curated groups of hymns that may share a component even though the
//! typing rules would otherwise reject them. Each group is removed from a
//! component as a whole before the component is checked.

use crate::key::{HymnKey, HymnType, SIMPLIFIED_SUFFIX};

use crate::key::HymnType::{
    ChildrenSong, Chinese, ChineseSupplement, ClassicHymn, French, NewSong, NewTune, Tagalog,
};

type Group = &'static [(HymnType, &'static str, &'static str)];

const GB: &str = SIMPLIFIED_SUFFIX;

pub(crate) const LANGUAGE_EXCEPTIONS: &[Group] = &[
    &[
        (ClassicHymn, "1353", ""),
        (ClassicHymn, "8476", ""),
        (French, "129", ""),
        (Tagalog, "1353", ""),
        (Chinese, "476", ""),
        (Chinese, "476", GB),
    ],
    // h/8330 and ns/154 both translate ch/330.
    &[(ClassicHymn, "8330", ""), (NewSong, "154", "")],
    // ns/19 and ns/474 both translate ts/428.
    &[(NewSong, "19", ""), (NewSong, "474", "")],
    // h/505 has two Chinese translations.
    &[
        (Chinese, "383", ""),
        (Chinese, "383", GB),
        (ChineseSupplement, "27", ""),
        (ChineseSupplement, "27", GB),
    ],
    // h/893 has two Chinese translations.
    &[
        (Chinese, "641", ""),
        (Chinese, "641", GB),
        (ChineseSupplement, "917", ""),
        (ChineseSupplement, "917", GB),
    ],
    // h/1353 and h/8476 are two versions of one song and share translations.
    &[
        (ClassicHymn, "1353", ""),
        (ClassicHymn, "8476", ""),
        (Tagalog, "1353", ""),
        (Chinese, "476", ""),
        (Chinese, "476", GB),
    ],
    // ht/437 (from H4A) also translates h/437 alongside ht/c333.
    &[(Tagalog, "c333", ""), (Tagalog, "437", "")],
];

pub(crate) const RELEVANT_EXCEPTIONS: &[Group] = &[
    // Different versions of the same song.
    &[
        (ClassicHymn, "528", ""),
        (NewSong, "306", ""),
        (ClassicHymn, "8444", ""),
    ],
    // Same chorus.
    &[(ClassicHymn, "79", ""), (ClassicHymn, "8079", "")],
    // Two English translations of one song.
    &[(NewSong, "19", ""), (NewSong, "474", "")],
    // Same chorus.
    &[(ClassicHymn, "267", ""), (ClassicHymn, "1360", "")],
    // Four tunes of one song.
    &[
        (ClassicHymn, "720", ""),
        (ClassicHymn, "8526", ""),
        (NewTune, "720", ""),
        (NewTune, "720b", ""),
    ],
    // h/666 rewrites h/8661.
    &[(ClassicHymn, "666", ""), (ClassicHymn, "8661", "")],
    // h/445 is h/1359 without the chorus.
    &[(ClassicHymn, "445", ""), (ClassicHymn, "1359", "")],
    &[(ClassicHymn, "1353", ""), (ClassicHymn, "8476", "")],
    // h/1358 adapts h/921.
    &[(ClassicHymn, "921", ""), (ClassicHymn, "1358", "")],
    // ns/7 adapts h/18.
    &[(ClassicHymn, "18", ""), (NewSong, "7", "")],
    // c/21 shortens h/70.
    &[(ChildrenSong, "21", ""), (ClassicHymn, "70", "")],
    // c/162 shortens h/993.
    &[(ChildrenSong, "162", ""), (ClassicHymn, "993", "")],
    // ns/179 adapts h/1248.
    &[(ClassicHymn, "1248", ""), (NewSong, "179", "")],
    &[(NewSong, "154", ""), (ClassicHymn, "8330", "")],
];

pub(crate) fn group_keys(group: Group) -> Vec<HymnKey> {
    group
        .iter()
        .map(|(ty, number, suffix)| HymnKey::new(*ty, *number, Some(*suffix)))
        .collect()
}
