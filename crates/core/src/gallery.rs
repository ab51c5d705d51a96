//! Image gallery state tied to the active variant.
//!
//! The visible index only moves in response to [`ActiveVariantChanged`], so
//! clicks, back/forward and deep links all steer the gallery the same way.

use serde::Serialize;

use crate::events::ActiveVariantChanged;
use crate::types::MemberId;

/// An image and the family member it depicts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImage {
    pub url: String,
    pub member_id: MemberId,
}

/// Highlight state of one thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Highlight {
    Active,
    Inactive,
}

#[derive(Debug, Clone)]
pub struct Gallery {
    images: Vec<GalleryImage>,
    active_member: Option<MemberId>,
    visible_index: usize,
}

impl Gallery {
    pub fn new(images: Vec<GalleryImage>) -> Self {
        Self {
            images,
            active_member: None,
            visible_index: 0,
        }
    }

    /// Jump to the first image of the new active member. A member without
    /// images leaves the visible image where it was.
    pub fn active_variant_changed(&mut self, event: &ActiveVariantChanged) {
        self.active_member = Some(event.current);
        if let Some(index) = self
            .images
            .iter()
            .position(|image| image.member_id == event.current)
        {
            self.visible_index = index;
        }
    }

    /// Manual thumbnail navigation. Out-of-range indexes are ignored.
    pub fn show(&mut self, index: usize) {
        if index < self.images.len() {
            self.visible_index = index;
        }
    }

    pub fn visible_index(&self) -> usize {
        self.visible_index
    }

    pub fn visible_image(&self) -> Option<&GalleryImage> {
        self.images.get(self.visible_index)
    }

    /// Active for images owned by the active member, inactive otherwise.
    pub fn highlights(&self) -> Vec<Highlight> {
        self.images
            .iter()
            .map(|image| {
                if Some(image.member_id) == self.active_member {
                    Highlight::Active
                } else {
                    Highlight::Inactive
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gallery() -> Gallery {
        Gallery::new(vec![
            GalleryImage { url: "main-front.jpg".into(), member_id: 1 },
            GalleryImage { url: "main-back.jpg".into(), member_id: 1 },
            GalleryImage { url: "variant-front.jpg".into(), member_id: 2 },
        ])
    }

    fn changed(previous: Option<MemberId>, current: MemberId) -> ActiveVariantChanged {
        ActiveVariantChanged { previous, current, is_main: current == 1 }
    }

    #[test]
    fn change_moves_to_first_image_of_member() {
        let mut gallery = gallery();
        gallery.show(1);
        gallery.active_variant_changed(&changed(Some(1), 2));
        assert_eq!(gallery.visible_index(), 2);
        assert_eq!(
            gallery.highlights(),
            vec![Highlight::Inactive, Highlight::Inactive, Highlight::Active]
        );
    }

    #[test]
    fn member_without_images_keeps_position() {
        let mut gallery = gallery();
        gallery.show(1);
        gallery.active_variant_changed(&changed(Some(1), 3));
        assert_eq!(gallery.visible_index(), 1);
        assert!(gallery.highlights().iter().all(|h| *h == Highlight::Inactive));
    }

    #[test]
    fn show_ignores_out_of_range() {
        let mut gallery = gallery();
        gallery.show(9);
        assert_eq!(gallery.visible_index(), 0);
        assert_eq!(gallery.visible_image().map(|i| i.url.as_str()), Some("main-front.jpg"));
    }
}
