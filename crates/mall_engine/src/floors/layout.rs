use crate::geometry::{Rect, Region};

use super::{ColorTag, FloorId, Shop};

pub const SHOP_WIDTH: f32 = 50.0;
pub const SHOP_HEIGHT: f32 = 40.0;
pub const SHOP_GUTTER: f32 = 10.0;
/// Distance from the region's top-left corner to the first shop.
pub const SHOP_INSET: f32 = 20.0;

/// Packs `count` equally sized shops into `region`, row-major, starting at the top-left.
///
/// When the packed rows run past `region.max_y` the cursor wraps back to the first row, so
/// later shops silently overlap earlier ones. Callers that care must size `region` for
/// `count`.
pub fn generate_shops(count: u32, region: Region, floor: FloorId) -> Vec<Shop> {
    let start_x = region.min_x + SHOP_INSET;
    let start_y = region.min_y + SHOP_INSET;
    let mut x = start_x;
    let mut y = start_y;
    let mut shops = Vec::with_capacity(count as usize);

    for index in 1..=count {
        shops.push(Shop {
            id: format!("{}-{index}", floor.key()),
            index,
            name: format!("Shop {index}"),
            bounds: Rect::new(x, y, SHOP_WIDTH, SHOP_HEIGHT),
            color: ColorTag::for_index(index),
        });

        x += SHOP_WIDTH + SHOP_GUTTER;
        if x + SHOP_WIDTH > region.max_x {
            x = start_x;
            y += SHOP_HEIGHT + SHOP_GUTTER;
            if y + SHOP_HEIGHT > region.max_y {
                y = start_y;
            }
        }
    }

    shops
}

#[cfg(test)]
mod tests {
    use super::*;

    const MALL_REGION: Region = Region::new(100.0, 100.0, 800.0, 500.0);

    #[test]
    fn generation_is_deterministic() {
        let first = generate_shops(60, MALL_REGION, FloorId::Ground);
        let second = generate_shops(60, MALL_REGION, FloorId::Ground);
        assert_eq!(first, second);
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.bounds.x.to_bits(), b.bounds.x.to_bits());
            assert_eq!(a.bounds.y.to_bits(), b.bounds.y.to_bits());
        }
    }

    #[test]
    fn first_shop_starts_at_inset_corner() {
        let shops = generate_shops(60, MALL_REGION, FloorId::Ground);
        let first = &shops[0];
        assert_eq!(first.id, "1-1");
        assert_eq!(first.name, "Shop 1");
        assert_eq!(first.bounds, Rect::new(120.0, 120.0, 50.0, 40.0));
        assert_eq!(first.color, ColorTag::for_index(1));
    }

    #[test]
    fn rows_wrap_when_next_shop_would_cross_max_x() {
        let shops = generate_shops(60, MALL_REGION, FloorId::Basement1);
        // 11 shops fit between x=120 and x=800.
        assert_eq!(shops[10].bounds.x, 720.0);
        assert_eq!(shops[10].bounds.y, 120.0);
        assert_eq!(shops[11].bounds.x, 120.0);
        assert_eq!(shops[11].bounds.y, 170.0);
        assert_eq!(shops[11].id, "-1-12");
    }

    #[test]
    fn shipped_count_fits_without_overlap() {
        let shops = generate_shops(60, MALL_REGION, FloorId::Basement2);
        for (i, a) in shops.iter().enumerate() {
            for b in &shops[i + 1..] {
                assert!(!a.bounds.overlaps(&b.bounds), "{} overlaps {}", a.id, b.id);
            }
        }
    }

    #[test]
    fn overflowing_rows_wrap_back_to_first_row() {
        // Two shops per row, two rows per region: the fifth shop lands on the first.
        let region = Region::new(0.0, 0.0, 150.0, 120.0);
        let shops = generate_shops(5, region, FloorId::Ground);
        assert_eq!(shops[2].bounds.y, 70.0);
        assert_eq!(shops[4].bounds, shops[0].bounds);
        assert_ne!(shops[4].id, shops[0].id);
    }

    #[test]
    fn zero_count_yields_no_shops() {
        assert!(generate_shops(0, MALL_REGION, FloorId::Ground).is_empty());
    }
}
