pub mod bounds;
pub mod camera;

pub use bounds::Aabb;
pub use camera::{OrthographicCamera, PerspectiveCamera};

use glam::{EulerRot, Mat4, Quat, Vec3};
use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of an object in the scene graph.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("object {0} is not in the scene graph")]
    UnknownObject(ObjectId),
    #[error("cannot parent {child} under its own descendant {parent}")]
    Cycle { parent: ObjectId, child: ObjectId },
}

pub type Result<T> = std::result::Result<T, SceneError>;

/// 24-bit RGB colour stored as a hex value (`0xRRGGBB`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "u32")]
pub struct Color(pub u32);

impl From<u32> for Color {
    fn from(hex: u32) -> Self {
        Self::from_hex(hex)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    pub const WHITE: Self = Self(0xffffff);

    pub fn from_hex(hex: u32) -> Self {
        Self(hex & 0xffffff)
    }

    pub fn set_hex(&mut self, hex: u32) {
        self.0 = hex & 0xffffff;
    }

    pub fn hex(&self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureMapping {
    #[default]
    Uv,
    EquirectangularReflection,
    CubeUvReflection,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TextureSource {
    Image { name: String },
    Prefiltered { scene: String, sigma: f32 },
}

/// Shared texture. The mapping tag is interior so every holder of the
/// handle sees a retag.
#[derive(Debug)]
pub struct Texture {
    source: TextureSource,
    mapping: Cell<TextureMapping>,
}

pub type TextureHandle = Rc<Texture>;

impl Texture {
    pub fn image(name: &str) -> TextureHandle {
        Rc::new(Self {
            source: TextureSource::Image {
                name: name.to_string(),
            },
            mapping: Cell::new(TextureMapping::Uv),
        })
    }

    pub fn prefiltered(scene: &str, sigma: f32) -> TextureHandle {
        Rc::new(Self {
            source: TextureSource::Prefiltered {
                scene: scene.to_string(),
                sigma,
            },
            mapping: Cell::new(TextureMapping::CubeUvReflection),
        })
    }

    pub fn source(&self) -> &TextureSource {
        &self.source
    }

    pub fn mapping(&self) -> TextureMapping {
        self.mapping.get()
    }

    pub fn set_mapping(&self, mapping: TextureMapping) {
        self.mapping.set(mapping);
    }
}

#[derive(Debug, Clone)]
pub enum Background {
    Color(Color),
    Texture(TextureHandle),
}

impl Background {
    pub fn texture(&self) -> Option<&TextureHandle> {
        match self {
            Background::Texture(texture) => Some(texture),
            Background::Color(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FogId(u64);

static NEXT_FOG_ID: AtomicU64 = AtomicU64::new(1);

impl FogId {
    fn next() -> Self {
        Self(NEXT_FOG_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FogVariant {
    Linear,
    Exponential,
}

impl fmt::Display for FogVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FogVariant::Linear => f.write_str("linear"),
            FogVariant::Exponential => f.write_str("exponential"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearFog {
    id: FogId,
    pub color: Color,
    pub near: f32,
    pub far: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExponentialFog {
    id: FogId,
    pub color: Color,
    pub density: f32,
}

/// Scene fog. Each constructed fog gets a fresh [`FogId`]; editing fields in
/// place keeps it.
#[derive(Debug, Clone, PartialEq)]
pub enum Fog {
    Linear(LinearFog),
    Exponential(ExponentialFog),
}

impl Fog {
    pub fn linear(color: Color, near: f32, far: f32) -> Self {
        Fog::Linear(LinearFog {
            id: FogId::next(),
            color,
            near,
            far,
        })
    }

    pub fn exponential(color: Color, density: f32) -> Self {
        Fog::Exponential(ExponentialFog {
            id: FogId::next(),
            color,
            density,
        })
    }

    pub fn id(&self) -> FogId {
        match self {
            Fog::Linear(fog) => fog.id,
            Fog::Exponential(fog) => fog.id,
        }
    }

    pub fn variant(&self) -> FogVariant {
        match self {
            Fog::Linear(_) => FogVariant::Linear,
            Fog::Exponential(_) => FogVariant::Exponential,
        }
    }
}

/// Root container state. The root itself is an object in the graph.
#[derive(Debug, Clone)]
pub struct Scene {
    pub root: ObjectId,
    pub background: Option<Background>,
    pub background_blurriness: f32,
    pub environment: Option<TextureHandle>,
    pub fog: Option<Fog>,
}

impl Scene {
    pub fn new(graph: &mut SceneGraph) -> Self {
        let root = graph.insert("Scene", ObjectKind::Scene);
        Self {
            root,
            background: None,
            background_blurriness: 0.0,
            environment: None,
            fog: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightKind {
    Ambient,
    Point,
    Directional,
    Spot,
    Hemisphere,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    Scene,
    Group,
    Mesh,
    SkinnedMesh,
    PerspectiveCamera(PerspectiveCamera),
    OrthographicCamera(OrthographicCamera),
    Light(LightKind),
}

impl ObjectKind {
    pub fn is_camera(&self) -> bool {
        matches!(
            self,
            ObjectKind::PerspectiveCamera(_) | ObjectKind::OrthographicCamera(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub needs_update: bool,
    pub version: u32,
}

impl Material {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            needs_update: false,
            version: 0,
        }
    }

    pub fn mark_needs_update(&mut self) {
        self.needs_update = true;
        self.version = self.version.wrapping_add(1);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_euler_degrees(position: [f32; 3], rotation_deg: [f32; 3], scale: [f32; 3]) -> Self {
        // Rotation order: Z (roll) * Y (yaw) * X (pitch)
        let rotation = Quat::from_euler(
            EulerRot::ZYX,
            rotation_deg[2].to_radians(),
            rotation_deg[1].to_radians(),
            rotation_deg[0].to_radians(),
        );
        Self {
            position: Vec3::from_array(position),
            rotation,
            scale: Vec3::from_array(scale),
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

#[derive(Debug, Clone)]
pub struct Object {
    pub id: ObjectId,
    pub name: String,
    pub kind: ObjectKind,
    pub transform: Transform,
    /// Local-space extent of the object's own geometry, if it has any.
    pub geometry: Option<Aabb>,
    pub material: Option<Material>,
    parent: Option<ObjectId>,
    children: Vec<ObjectId>,
}

impl Object {
    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }
}

/// Arena of scene objects. Objects outside the root's subtree (the editor
/// camera, removed objects) stay addressable but are not traversed.
#[derive(Debug, Default)]
pub struct SceneGraph {
    objects: HashMap<ObjectId, Object>,
    next_id: u64,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn insert(&mut self, name: &str, kind: ObjectKind) -> ObjectId {
        let id = ObjectId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        self.objects.insert(
            id,
            Object {
                id,
                name: name.to_string(),
                kind,
                transform: Transform::default(),
                geometry: None,
                material: None,
                parent: None,
                children: Vec::new(),
            },
        );
        id
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn get(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        self.objects.get_mut(&id)
    }

    /// Re-parents `child` under `parent`, detaching it from any previous parent.
    pub fn add_child(&mut self, parent: ObjectId, child: ObjectId) -> Result<()> {
        if !self.contains(parent) {
            return Err(SceneError::UnknownObject(parent));
        }
        if !self.contains(child) {
            return Err(SceneError::UnknownObject(child));
        }
        if parent == child || self.is_ancestor_of(child, parent) {
            return Err(SceneError::Cycle { parent, child });
        }
        self.detach(child)?;
        if let Some(object) = self.objects.get_mut(&child) {
            object.parent = Some(parent);
        }
        if let Some(object) = self.objects.get_mut(&parent) {
            object.children.push(child);
        }
        Ok(())
    }

    /// Removes `id` from its parent's children. The object stays in the arena.
    pub fn detach(&mut self, id: ObjectId) -> Result<()> {
        let parent = self
            .objects
            .get_mut(&id)
            .ok_or(SceneError::UnknownObject(id))?
            .parent
            .take();
        if let Some(parent) = parent.and_then(|parent| self.objects.get_mut(&parent)) {
            parent.children.retain(|child| *child != id);
        }
        Ok(())
    }

    pub fn is_ancestor_of(&self, ancestor: ObjectId, id: ObjectId) -> bool {
        let mut current = self.get(id).and_then(Object::parent);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.get(parent).and_then(Object::parent);
        }
        false
    }

    pub fn world_matrix(&self, id: ObjectId) -> Option<Mat4> {
        let object = self.get(id)?;
        let local = object.transform.matrix();
        match object.parent {
            Some(parent) => Some(self.world_matrix(parent).unwrap_or(Mat4::IDENTITY) * local),
            None => Some(local),
        }
    }

    pub fn world_position(&self, id: ObjectId) -> Option<Vec3> {
        self.world_matrix(id)
            .map(|matrix| matrix.transform_point3(Vec3::ZERO))
    }

    /// Pre-order walk of `root` and its descendants.
    pub fn traverse(&self, root: ObjectId) -> Vec<ObjectId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(object) = self.get(id) else {
                continue;
            };
            out.push(id);
            stack.extend(object.children.iter().rev().copied());
        }
        out
    }

    /// World-space extent of `id` and its descendants' geometry.
    pub fn bounds_of(&self, id: ObjectId) -> Aabb {
        let mut bounds = Aabb::EMPTY;
        for node in self.traverse(id) {
            let Some(local) = self.get(node).and_then(|object| object.geometry) else {
                continue;
            };
            let world = self.world_matrix(node).unwrap_or(Mat4::IDENTITY);
            bounds = bounds.union(&local.transformed(&world));
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Aabb, Color, Fog, FogVariant, ObjectKind, Scene, SceneError, SceneGraph, Texture,
        TextureMapping, Transform,
    };
    use glam::Vec3;

    fn unit_box() -> Aabb {
        Aabb::from_arrays([-0.5, -0.5, -0.5], [0.5, 0.5, 0.5])
    }

    #[test]
    fn bounds_include_descendants_in_world_space() {
        let mut graph = SceneGraph::new();
        let scene = Scene::new(&mut graph);
        let group = graph.insert("Group", ObjectKind::Group);
        let mesh = graph.insert("Box", ObjectKind::Mesh);
        graph.add_child(scene.root, group).unwrap();
        graph.add_child(group, mesh).unwrap();
        graph.get_mut(group).unwrap().transform.position = Vec3::new(10.0, 0.0, 0.0);
        graph.get_mut(mesh).unwrap().geometry = Some(unit_box());

        let bounds = graph.bounds_of(group);
        assert!(!bounds.is_empty());
        assert_eq!(bounds.center(), Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(graph.bounds_of(scene.root), bounds);
    }

    #[test]
    fn objects_without_geometry_have_empty_bounds() {
        let mut graph = SceneGraph::new();
        let light = graph.insert("Light", ObjectKind::Light(super::LightKind::Point));
        assert!(graph.bounds_of(light).is_empty());
    }

    #[test]
    fn add_child_rejects_cycles_and_reparents() {
        let mut graph = SceneGraph::new();
        let a = graph.insert("A", ObjectKind::Group);
        let b = graph.insert("B", ObjectKind::Group);
        let c = graph.insert("C", ObjectKind::Group);
        graph.add_child(a, b).unwrap();
        assert_eq!(
            graph.add_child(b, a),
            Err(SceneError::Cycle { parent: b, child: a })
        );
        graph.add_child(c, b).unwrap();
        assert!(graph.get(a).unwrap().children().is_empty());
        assert_eq!(graph.get(b).unwrap().parent(), Some(c));
    }

    #[test]
    fn detached_objects_are_not_traversed() {
        let mut graph = SceneGraph::new();
        let scene = Scene::new(&mut graph);
        let mesh = graph.insert("Mesh", ObjectKind::Mesh);
        graph.add_child(scene.root, mesh).unwrap();
        graph.detach(mesh).unwrap();
        assert_eq!(graph.traverse(scene.root), vec![scene.root]);
        assert!(graph.contains(mesh));
    }

    #[test]
    fn fog_ids_are_fresh_per_construction() {
        let a = Fog::linear(Color::from_hex(0x112233), 1.0, 10.0);
        let b = Fog::linear(Color::from_hex(0x112233), 1.0, 10.0);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.variant(), FogVariant::Linear);
        assert_eq!(Fog::exponential(Color::WHITE, 0.1).variant(), FogVariant::Exponential);
    }

    #[test]
    fn texture_retag_is_visible_through_every_handle() {
        let texture = Texture::image("sky.hdr");
        let other = texture.clone();
        texture.set_mapping(TextureMapping::EquirectangularReflection);
        assert_eq!(other.mapping(), TextureMapping::EquirectangularReflection);
    }

    #[test]
    fn euler_transform_rotates_about_y() {
        let transform = Transform::from_euler_degrees([0.0; 3], [0.0, 90.0, 0.0], [1.0; 3]);
        let rotated = transform.matrix().transform_vector3(Vec3::X);
        assert!((rotated - Vec3::NEG_Z).length() < 1e-5);
    }

    #[test]
    fn deserialized_colors_are_masked_to_24_bits() {
        let color: Color = serde_json::from_str("33554431").unwrap();
        assert_eq!(color, Color::from_hex(0xffffff));
        assert_eq!(color.hex(), 0xffffff);
        let color: Color = serde_json::from_str("1052688").unwrap();
        assert_eq!(color.hex(), 0x101010);
    }
}
