//! Route catalogue: which sections each page is made of.
//!
//! Only layout-relevant facts live here (heights, which behaviour a section
//! carries).  Copy and visuals belong to the renderer.

/// Behaviour attached to a section.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionKind {
    Plain,
    /// Pinned while `extent` pixels of scroll fan the cards out.
    Cards { extent: f64, rotations: Vec<f64> },
    /// A row of pointer-reactive buttons.
    Magnetic { buttons: usize },
    /// Wheel accumulation leading to the next page.
    Gate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionSpec {
    pub title: &'static str,
    /// Height in page pixels (excluding any pin spacer).
    pub height: f64,
    pub kind: SectionKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageSpec {
    pub title: &'static str,
    pub sections: Vec<SectionSpec>,
}

/// Rotation fan used by the card sections.
pub const CARD_FAN: [f64; 4] = [-15.0, -7.5, 7.5, 15.0];

fn section(title: &'static str, height: f64, kind: SectionKind) -> SectionSpec {
    SectionSpec {
        title,
        height,
        kind,
    }
}

/// All routes in navigation order.  `pin_extent` is the scroll distance each
/// card section consumes while pinned.
pub fn catalogue(pin_extent: f64) -> Vec<PageSpec> {
    let cards = || SectionKind::Cards {
        extent: pin_extent,
        rotations: CARD_FAN.to_vec(),
    };
    vec![
        PageSpec {
            title: "Home",
            sections: vec![
                section("Hero", 720.0, SectionKind::Plain),
                section("Services", 600.0, SectionKind::Magnetic { buttons: 3 }),
                section("Projects", 720.0, cards()),
                section("Next: News", 720.0, SectionKind::Gate),
            ],
        },
        PageSpec {
            title: "News",
            sections: vec![
                section("Latest", 900.0, SectionKind::Plain),
                section("Highlights", 720.0, cards()),
                section("Next: Contact", 720.0, SectionKind::Gate),
            ],
        },
        PageSpec {
            title: "Contact",
            sections: vec![
                section("Say hello", 600.0, SectionKind::Magnetic { buttons: 2 }),
                section("Offices", 700.0, SectionKind::Plain),
                section("Back to Home", 720.0, SectionKind::Gate),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_ends_in_a_gate() {
        for page in catalogue(1200.0) {
            let last = page.sections.last().map(|s| &s.kind);
            assert_eq!(last, Some(&SectionKind::Gate), "page {}", page.title);
        }
    }
}
