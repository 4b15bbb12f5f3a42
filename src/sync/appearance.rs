use super::{Redraw, Result, SyncError};
use crate::render::Viewport;
use crate::scene::{Background, Color, Fog, FogVariant, Scene, TextureHandle, TextureMapping};
use crate::signals::{BackgroundKind, EnvironmentKind, FogKind, FogParams};

pub(crate) fn background_changed(
    scene: &mut Scene,
    kind: Option<BackgroundKind>,
    color: Option<Color>,
    texture: Option<&TextureHandle>,
    equirectangular_texture: Option<&TextureHandle>,
    blurriness: f32,
) -> Redraw {
    let Some(kind) = kind else {
        log::debug!("Background type unset; background left unchanged");
        return Redraw::Skip;
    };

    match kind {
        BackgroundKind::None => scene.background = None,
        BackgroundKind::Color => {
            scene.background = Some(Background::Color(color.unwrap_or_default()));
        }
        BackgroundKind::Texture => match texture {
            Some(texture) => scene.background = Some(Background::Texture(texture.clone())),
            None => log::debug!("Texture background without a texture; background left unchanged"),
        },
        BackgroundKind::Unrecognised => {
            log::debug!("Unrecognised background type; background left unchanged")
        }
        BackgroundKind::Equirectangular => match equirectangular_texture {
            Some(texture) => {
                texture.set_mapping(TextureMapping::EquirectangularReflection);
                scene.background = Some(Background::Texture(texture.clone()));
                scene.background_blurriness = blurriness;
            }
            None => log::debug!(
                "Equirectangular background without a texture; background left unchanged"
            ),
        },
    }
    Redraw::Now
}

pub(crate) fn environment_changed(
    viewport: &mut Viewport,
    kind: Option<EnvironmentKind>,
    equirectangular_texture: Option<&TextureHandle>,
) -> Redraw {
    match kind {
        Some(EnvironmentKind::None) => viewport.scene.environment = None,
        Some(EnvironmentKind::Equirectangular) => {
            viewport.scene.environment = None;
            if let Some(texture) = equirectangular_texture {
                texture.set_mapping(TextureMapping::EquirectangularReflection);
                viewport.scene.environment = Some(texture.clone());
            }
        }
        Some(EnvironmentKind::ModelViewer) => {
            viewport.scene.environment = Some(viewport.generate_room_environment());
        }
        None => log::debug!("Environment type unset; environment left unchanged"),
    }
    Redraw::Now
}

/// Replaces the fog wholesale.
pub(crate) fn fog_changed(scene: &mut Scene, kind: Option<FogKind>, params: &FogParams) -> Redraw {
    match kind {
        Some(FogKind::None) => scene.fog = None,
        Some(FogKind::Fog) => scene.fog = Some(Fog::linear(params.color, params.near, params.far)),
        Some(FogKind::FogExp2) => scene.fog = Some(Fog::exponential(params.color, params.density)),
        None => log::debug!("Fog type unset; fog left unchanged"),
    }
    Redraw::Now
}

/// Edits the active fog in place; its identity survives.
pub(crate) fn fog_settings_changed(
    scene: &mut Scene,
    kind: Option<FogKind>,
    params: &FogParams,
) -> Result<()> {
    let expected = match kind {
        Some(FogKind::Fog) => FogVariant::Linear,
        Some(FogKind::FogExp2) => FogVariant::Exponential,
        Some(FogKind::None) | None => return Ok(()),
    };
    match (scene.fog.as_mut(), expected) {
        (Some(Fog::Linear(fog)), FogVariant::Linear) => {
            fog.color.set_hex(params.color.hex());
            fog.near = params.near;
            fog.far = params.far;
            Ok(())
        }
        (Some(Fog::Exponential(fog)), FogVariant::Exponential) => {
            fog.color.set_hex(params.color.hex());
            fog.density = params.density;
            Ok(())
        }
        (Some(active), expected) => Err(SyncError::FogVariantMismatch {
            expected,
            active: active.variant(),
        }),
        (None, expected) => Err(SyncError::NoActiveFog { expected }),
    }
}

#[cfg(test)]
mod tests {
    use super::fog_settings_changed;
    use crate::scene::{Background, Color, Fog, FogVariant, Texture, TextureMapping};
    use crate::signals::{BackgroundKind, EnvironmentKind, FogKind, FogParams, Signal};
    use crate::sync::test_support::Harness;
    use crate::sync::SyncError;
    use std::rc::Rc;

    fn background(kind: Option<BackgroundKind>) -> Signal {
        Signal::SceneBackgroundChanged {
            kind,
            color: Some(Color::from_hex(0x336699)),
            texture: None,
            equirectangular_texture: None,
            blurriness: 0.0,
        }
    }

    #[test]
    fn unset_background_type_changes_nothing() {
        let mut harness = Harness::new();
        harness.publish(background(Some(BackgroundKind::Color)));
        assert_eq!(harness.publish(background(None)), 0);
        assert!(matches!(
            harness.viewport.borrow().scene.background,
            Some(Background::Color(color)) if color.hex() == 0x336699
        ));
    }

    #[test]
    fn background_none_clears_and_renders() {
        let mut harness = Harness::new();
        harness.publish(background(Some(BackgroundKind::Color)));
        assert_eq!(harness.publish(background(Some(BackgroundKind::None))), 1);
        assert!(harness.viewport.borrow().scene.background.is_none());
    }

    #[test]
    fn texture_background_without_texture_keeps_previous() {
        let mut harness = Harness::new();
        harness.publish(background(Some(BackgroundKind::Color)));
        assert_eq!(harness.publish(background(Some(BackgroundKind::Texture))), 1);
        assert!(matches!(
            harness.viewport.borrow().scene.background,
            Some(Background::Color(_))
        ));
    }

    #[test]
    fn unrecognised_background_type_renders_without_change() {
        let mut harness = Harness::new();
        harness.publish(background(Some(BackgroundKind::Color)));
        assert_eq!(harness.publish(background(Some(BackgroundKind::Unrecognised))), 1);
        assert!(matches!(
            harness.viewport.borrow().scene.background,
            Some(Background::Color(color)) if color.hex() == 0x336699
        ));
    }

    #[test]
    fn texture_background_uses_the_given_handle() {
        let mut harness = Harness::new();
        let texture = Texture::image("checker.png");
        let rendered = harness.publish(Signal::SceneBackgroundChanged {
            kind: Some(BackgroundKind::Texture),
            color: None,
            texture: Some(texture.clone()),
            equirectangular_texture: None,
            blurriness: 0.0,
        });
        assert_eq!(rendered, 1);

        let viewport = harness.viewport.borrow();
        let background = viewport.scene.background.as_ref().and_then(Background::texture);
        assert!(background.is_some_and(|bg| Rc::ptr_eq(bg, &texture)));
        assert_eq!(texture.mapping(), TextureMapping::Uv);
    }

    #[test]
    fn equirectangular_environment_assigns_and_tags_texture() {
        let mut harness = Harness::new();
        let texture = Texture::image("sunset.hdr");
        let rendered = harness.publish(Signal::SceneEnvironmentChanged {
            kind: Some(EnvironmentKind::Equirectangular),
            equirectangular_texture: Some(texture.clone()),
        });
        assert_eq!(rendered, 1);

        let viewport = harness.viewport.borrow();
        let environment = viewport.scene.environment.as_ref();
        assert!(environment.is_some_and(|env| Rc::ptr_eq(env, &texture)));
        assert_eq!(texture.mapping(), TextureMapping::EquirectangularReflection);
    }

    #[test]
    fn equirectangular_background_tags_texture_and_sets_blur() {
        let mut harness = Harness::new();
        let texture = Texture::image("studio.hdr");
        let rendered = harness.publish(Signal::SceneBackgroundChanged {
            kind: Some(BackgroundKind::Equirectangular),
            color: None,
            texture: None,
            equirectangular_texture: Some(texture.clone()),
            blurriness: 0.3,
        });
        assert_eq!(rendered, 1);

        let viewport = harness.viewport.borrow();
        let background = viewport.scene.background.as_ref().and_then(Background::texture);
        assert!(background.is_some_and(|bg| Rc::ptr_eq(bg, &texture)));
        assert_eq!(texture.mapping(), TextureMapping::EquirectangularReflection);
        assert_eq!(viewport.scene.background_blurriness, 0.3);
    }

    #[test]
    fn equirectangular_environment_without_texture_clears() {
        let mut harness = Harness::new();
        harness.publish(Signal::SceneEnvironmentChanged {
            kind: Some(EnvironmentKind::ModelViewer),
            equirectangular_texture: None,
        });
        assert!(harness.viewport.borrow().scene.environment.is_some());

        let rendered = harness.publish(Signal::SceneEnvironmentChanged {
            kind: Some(EnvironmentKind::Equirectangular),
            equirectangular_texture: None,
        });
        assert_eq!(rendered, 1);
        assert!(harness.viewport.borrow().scene.environment.is_none());
    }

    #[test]
    fn model_viewer_environment_is_prefiltered_room() {
        let mut harness = Harness::new();
        harness.publish(Signal::SceneEnvironmentChanged {
            kind: Some(EnvironmentKind::ModelViewer),
            equirectangular_texture: None,
        });
        let viewport = harness.viewport.borrow();
        let environment = viewport.scene.environment.as_ref().expect("environment set");
        assert_eq!(
            environment.source(),
            &crate::scene::TextureSource::Prefiltered {
                scene: "RoomEnvironment".to_string(),
                sigma: 0.04,
            }
        );
    }

    #[test]
    fn exponential_fog_then_none_clears_fog() {
        let mut harness = Harness::new();
        let params = FogParams {
            density: 0.2,
            ..FogParams::default()
        };
        assert_eq!(
            harness.publish(Signal::SceneFogChanged {
                kind: Some(FogKind::FogExp2),
                params,
            }),
            1
        );
        assert!(matches!(
            harness.viewport.borrow().scene.fog,
            Some(Fog::Exponential(ref fog)) if fog.density == 0.2
        ));
        harness.publish(Signal::SceneFogChanged {
            kind: Some(FogKind::None),
            params,
        });
        assert!(harness.viewport.borrow().scene.fog.is_none());
    }

    #[test]
    fn fog_settings_edit_keeps_fog_identity() {
        let mut harness = Harness::new();
        harness.publish(Signal::SceneFogChanged {
            kind: Some(FogKind::Fog),
            params: FogParams::default(),
        });
        let original = harness.viewport.borrow().scene.fog.as_ref().unwrap().id();

        let rendered = harness.publish(Signal::SceneFogSettingsChanged {
            kind: Some(FogKind::Fog),
            params: FogParams {
                color: Color::from_hex(0x101010),
                near: 2.0,
                far: 20.0,
                density: 0.0,
            },
        });
        assert_eq!(rendered, 1);

        let viewport = harness.viewport.borrow();
        match viewport.scene.fog.as_ref() {
            Some(Fog::Linear(fog)) => {
                assert_eq!(fog.color, Color::from_hex(0x101010));
                assert_eq!((fog.near, fog.far), (2.0, 20.0));
            }
            other => panic!("Expected linear fog, got {:?}", other),
        }
        assert_eq!(viewport.scene.fog.as_ref().unwrap().id(), original);
    }

    #[test]
    fn fog_settings_without_fog_is_a_logged_no_op() {
        let mut harness = Harness::new();
        let rendered = harness.publish(Signal::SceneFogSettingsChanged {
            kind: Some(FogKind::FogExp2),
            params: FogParams::default(),
        });
        assert_eq!(rendered, 1);
        assert!(harness.viewport.borrow().scene.fog.is_none());
    }

    #[test]
    fn fog_settings_reports_variant_mismatch() {
        let mut harness = Harness::new();
        harness.publish(Signal::SceneFogChanged {
            kind: Some(FogKind::FogExp2),
            params: FogParams::default(),
        });
        let mut viewport = harness.viewport.borrow_mut();
        let before = viewport.scene.fog.clone();
        let err = fog_settings_changed(
            &mut viewport.scene,
            Some(FogKind::Fog),
            &FogParams::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            SyncError::FogVariantMismatch {
                expected: FogVariant::Linear,
                active: FogVariant::Exponential,
            }
        );
        assert_eq!(viewport.scene.fog, before);
        let mut empty = viewport.scene.clone();
        empty.fog = None;
        assert_eq!(
            fog_settings_changed(&mut empty, Some(FogKind::Fog), &FogParams::default()),
            Err(SyncError::NoActiveFog {
                expected: FogVariant::Linear
            })
        );
    }
}
