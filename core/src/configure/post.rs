use log::debug;

use crate::catalog::QualityPreset;
use crate::host::{BlendMode, Compositor, NodeKind};
use crate::prelude::HostResult;

// Tuned for a low-end surveillance camera look. Not drawn from the variation
// profile.
pub const GRAIN_AMOUNT: f32 = 0.08;
pub const GRAIN_SIZE: f32 = 1.5;
pub const BLUR_RADIUS_PX: u32 = 1;
pub const BRIGHTNESS: f32 = -2.0;
pub const CONTRAST: f32 = 8.0;
pub const GRAIN_MIX_FACTOR: f32 = 0.15;

/// Builds the grain/blur/contrast compositing chain for noisy presets.
pub struct PostProcessConfigurator;

impl PostProcessConfigurator {
    /// Returns whether a chain was built. Presets without noise leave the
    /// compositor untouched.
    ///
    /// Chain: render layers -> blur -> bright/contrast -> mix(add, grain) -> composite.
    pub fn configure<C: Compositor + ?Sized>(
        compositor: &mut C,
        preset: &QualityPreset,
    ) -> HostResult<bool> {
        if !preset.noise_enabled {
            debug!("preset {} has no noise chain", preset.tier);
            return Ok(false);
        }

        compositor.use_nodes()?;
        compositor.clear_chain()?;
        let input = compositor.render_layers()?;
        let output = compositor.composite_output()?;

        let blur = compositor.add_node(NodeKind::Blur {
            radius_px: BLUR_RADIUS_PX,
        })?;
        let grade = compositor.add_node(NodeKind::BrightContrast {
            brightness: BRIGHTNESS,
            contrast: CONTRAST,
        })?;
        let grain = compositor.add_node(NodeKind::Grain {
            amount: GRAIN_AMOUNT,
            size: GRAIN_SIZE,
        })?;
        let mix = compositor.add_node(NodeKind::Mix {
            blend: BlendMode::Add,
            factor: GRAIN_MIX_FACTOR,
        })?;

        compositor.link(input, blur, 0)?;
        compositor.link(blur, grade, 0)?;
        compositor.link(grade, mix, 0)?;
        compositor.link(grain, mix, 1)?;
        compositor.link(mix, output, 0)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::QualityTier;
    use crate::host::MemoryHost;

    #[test]
    fn noisy_preset_builds_chain_into_composite() {
        let mut host = MemoryHost::new();
        let built = PostProcessConfigurator::configure(&mut host, &QualityTier::Tiny.preset())
            .unwrap();
        assert!(built);

        let compositor = &host.state().compositor;
        assert!(compositor.use_nodes);
        assert_eq!(compositor.nodes.len(), 6);
        assert_eq!(compositor.links.len(), 5);

        let output = host.composite_output().unwrap();
        let feeding = compositor
            .links
            .iter()
            .find(|link| link.to == output && link.input == 0)
            .map(|link| link.from)
            .unwrap();
        let mix = compositor.node(feeding).unwrap();
        assert!(matches!(mix, NodeKind::Mix { blend: BlendMode::Add, .. }));
    }

    #[test]
    fn rebuilding_chain_replaces_previous_nodes() {
        let mut host = MemoryHost::new();
        let preset = QualityTier::Small.preset();
        PostProcessConfigurator::configure(&mut host, &preset).unwrap();
        let first = host.state().compositor.clone();
        PostProcessConfigurator::configure(&mut host, &preset).unwrap();

        assert_eq!(host.state().compositor.nodes.len(), first.nodes.len());
        assert_eq!(host.state().compositor.links.len(), first.links.len());
    }

    #[test]
    fn clean_preset_leaves_compositor_untouched() {
        let mut host = MemoryHost::new();
        let built = PostProcessConfigurator::configure(&mut host, &QualityTier::High.preset())
            .unwrap();
        assert!(!built);
        assert!(!host.state().compositor.use_nodes);
        assert!(host.state().compositor.nodes.is_empty());
    }
}
