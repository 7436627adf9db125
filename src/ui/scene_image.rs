use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use eframe::egui;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::model::scene_image::SceneImage;

const PLACEHOLDER_SIZE: [usize; 2] = [256, 144];

/// Keeps the texture for the current scene image alive between frames.
#[derive(Default)]
pub struct SceneTexture {
    source: Option<SceneImage>,
    texture: Option<egui::TextureHandle>,
}

impl SceneTexture {
    pub fn texture(
        &mut self,
        ctx: &egui::Context,
        image: Option<&SceneImage>,
    ) -> Option<&egui::TextureHandle> {
        let Some(image) = image else {
            self.source = None;
            self.texture = None;
            return None;
        };

        if self.source.as_ref() != Some(image) {
            self.texture = Some(load(ctx, "scene", image));
            self.source = Some(image.clone());
        }

        self.texture.as_ref()
    }
}

/// Inventory icon textures, keyed by item name.
#[derive(Default)]
pub struct IconTextures {
    icons: HashMap<String, (SceneImage, egui::TextureHandle)>,
}

impl IconTextures {
    pub fn texture(
        &mut self,
        ctx: &egui::Context,
        item: &str,
        image: &SceneImage,
    ) -> &egui::TextureHandle {
        let stale = self
            .icons
            .get(item)
            .is_none_or(|(source, _)| source != image);
        if stale {
            let texture = load(ctx, &format!("icon:{item}"), image);
            self.icons.insert(item.to_string(), (image.clone(), texture));
        }
        &self.icons[item].1
    }

    pub fn clear(&mut self) {
        self.icons.clear();
    }
}

fn load(ctx: &egui::Context, name: &str, image: &SceneImage) -> egui::TextureHandle {
    let pixels = to_color_image(image).unwrap_or_else(|e| {
        tracing::warn!(name, "image unusable, drawing placeholder: {e:#}");
        placeholder(rand::random())
    });
    ctx.load_texture(name, pixels, egui::TextureOptions::LINEAR)
}

fn to_color_image(image: &SceneImage) -> Result<egui::ColorImage> {
    match image {
        SceneImage::Placeholder { seed } => Ok(placeholder(*seed)),
        SceneImage::Encoded { .. } => {
            let bytes = image
                .decode_bytes()
                .context("decoding base64 image")?
                .ok_or_else(|| anyhow!("image carries no bytes"))?;
            let rgba = image::load_from_memory(&bytes)
                .context("decoding image bytes")?
                .to_rgba8();
            let size = [rgba.width() as usize, rgba.height() as usize];
            Ok(egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
        }
    }
}

/// A dusky two-tone gradient with a little grain, stable for a given seed.
pub fn placeholder(seed: u64) -> egui::ColorImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let top: [f32; 3] = [rng.gen_range(10.0..60.0), rng.gen_range(10.0..50.0), rng.gen_range(30.0..90.0)];
    let bottom: [f32; 3] = [rng.gen_range(60.0..140.0), rng.gen_range(40.0..100.0), rng.gen_range(20.0..70.0)];

    let [w, h] = PLACEHOLDER_SIZE;
    let mut rgba = Vec::with_capacity(w * h * 4);
    for y in 0..h {
        let t = y as f32 / (h - 1) as f32;
        for _ in 0..w {
            let grain: f32 = rng.gen_range(-6.0..6.0);
            for c in 0..3 {
                let v = top[c] + (bottom[c] - top[c]) * t + grain;
                rgba.push(v.clamp(0.0, 255.0) as u8);
            }
            rgba.push(255);
        }
    }

    egui::ColorImage::from_rgba_unmultiplied(PLACEHOLDER_SIZE, &rgba)
}
