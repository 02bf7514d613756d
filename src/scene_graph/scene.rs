use glam::{Mat4, Quat, Vec3};
use id_arena::Arena;

use crate::math::{bounds, AABB};
use crate::scene_graph::object3d::{Object3D, ObjectId};
use crate::scene_graph::transform::Transform;

pub struct Scene {
    pub objects: Arena<Object3D>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Arena::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.len() == 0
    }

    pub fn add_object(&mut self, object: Object3D) -> ObjectId {
        self.objects.alloc(object)
    }

    /// Adds `object` and attaches it under `parent` in one step.
    pub fn add_child(&mut self, parent: ObjectId, object: Object3D) -> ObjectId {
        let object_id = self.add_object(object);
        self.set_object_parent(object_id, Some(parent));
        object_id
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&Object3D> {
        self.objects.get(id)
    }

    pub fn get_object_by_name(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, object)| object.name == name)
            .map(|(id, _)| id)
    }

    pub fn root_objects(&self) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|(_, object)| object.parent_id.is_none())
            .map(|(id, _)| id)
            .collect()
    }

    /// Pre-order walk of `root` and everything below it.
    pub fn descendants(&self, root: ObjectId) -> Vec<ObjectId> {
        let mut visited = Vec::new();
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            let Some(object) = self.objects.get(id) else {
                continue;
            };
            visited.push(id);
            // Reverse so the first child is visited first
            stack.extend(object.child_ids.iter().rev().copied());
        }

        visited
    }

    /// First object named `name` in the subtree under `root`, in pre-order.
    pub fn find_descendant_by_name(&self, root: ObjectId, name: &str) -> Option<ObjectId> {
        self.descendants(root)
            .into_iter()
            .find(|id| self.objects.get(*id).is_some_and(|object| object.name == name))
    }

    /// Deep copies the subtree rooted at `source_root` of `source` into this
    /// scene, attached under `parent`. Returns the id of the copied root.
    pub fn copy_subtree(
        &mut self,
        source: &Scene,
        source_root: ObjectId,
        parent: Option<ObjectId>,
    ) -> Option<ObjectId> {
        let object = source.get_object(source_root)?;
        let copy_id = self.add_object(object.detached_copy());

        if let Some(parent_id) = parent {
            self.set_object_parent(copy_id, Some(parent_id));
        }

        for &child_id in &object.child_ids {
            self.copy_subtree(source, child_id, Some(copy_id));
        }

        Some(copy_id)
    }

    /// Transform of `node` expressed in the frame of `ancestor`: the product of
    /// local matrices below `ancestor` down to and including `node`.
    ///
    /// Returns `None` if `ancestor` is not on the parent chain of `node`.
    pub fn relative_matrix(&self, ancestor: ObjectId, node: ObjectId) -> Option<Mat4> {
        let mut matrix = Mat4::IDENTITY;
        let mut current = node;

        while current != ancestor {
            let object = self.objects.get(current)?;
            matrix = object.transform.local_matrix() * matrix;
            current = object.parent_id?;
        }

        Some(matrix)
    }

    /// Origin of `node` in the frame of `ancestor`.
    pub fn relative_position(&self, ancestor: ObjectId, node: ObjectId) -> Option<Vec3> {
        self.relative_matrix(ancestor, node)
            .map(|matrix| matrix.transform_point3(Vec3::ZERO))
    }

    /// Union of every mesh extent under `root`, with `root` placed by
    /// `root_matrix` instead of its own transform.
    pub fn subtree_bounds(&self, root: ObjectId, root_matrix: Mat4) -> Option<AABB> {
        let object = self.objects.get(root)?;

        let own = object
            .mesh
            .as_ref()
            .map(|mesh| mesh.bounds.transformed(&root_matrix));

        let children = object.child_ids.iter().filter_map(|&child_id| {
            let child = self.objects.get(child_id)?;
            self.subtree_bounds(child_id, root_matrix * child.transform.local_matrix())
        });

        bounds::union_all(own.into_iter().chain(children))
    }

    /// Updates all object transforms in hierarchical order
    fn update_transforms(&self) {
        for root_id in self.root_objects() {
            self.update_object_transform_recursive(root_id, Mat4::IDENTITY, false);
        }
    }

    /// Recursively updates an object's world transform and its children
    fn update_object_transform_recursive(
        &self,
        object_id: ObjectId,
        parent_world_matrix: Mat4,
        parent_changed: bool,
    ) {
        if let Some(object) = self.objects.get(object_id) {
            let changed = parent_changed || object.transform.is_world_dirty();
            if changed {
                let local_matrix = *object.transform.get_local_matrix();
                let world_matrix = parent_world_matrix * local_matrix;
                object.transform.set_world_matrix(world_matrix);
            }

            let world_matrix = *object.transform.get_world_matrix();
            for &child_id in &object.child_ids {
                self.update_object_transform_recursive(child_id, world_matrix, changed);
            }
        }
    }

    /// Invalidates world transforms for an object and all its descendants
    pub fn invalidate_object_hierarchy(&self, object_id: ObjectId) {
        if let Some(object) = self.objects.get(object_id) {
            object.transform.invalidate_world();

            for &child_id in &object.child_ids {
                self.invalidate_object_hierarchy(child_id);
            }
        }
    }

    /// Sets the parent of an object and updates child relationships
    pub fn set_object_parent(&mut self, child_id: ObjectId, new_parent_id: Option<ObjectId>) {
        // Remove from old parent's children list
        if let Some(child) = self.objects.get(child_id) {
            if let Some(old_parent_id) = child.parent_id {
                if let Some(old_parent) = self.objects.get_mut(old_parent_id) {
                    old_parent.child_ids.retain(|&id| id != child_id);
                }
            }
        }

        // Set new parent and add to new parent's children list
        if let Some(child) = self.objects.get_mut(child_id) {
            child.parent_id = new_parent_id;

            if let Some(new_parent_id) = new_parent_id {
                if let Some(new_parent) = self.objects.get_mut(new_parent_id) {
                    new_parent.child_ids.push(child_id);
                }
            }
        }

        // Invalidate world transforms for the moved object and its descendants
        self.invalidate_object_hierarchy(child_id);
    }

    pub fn set_object_translation(&mut self, object_id: ObjectId, translation: Vec3) {
        if let Some(object) = self.objects.get_mut(object_id) {
            object.transform.set_translation(translation);
        }
        self.invalidate_object_hierarchy(object_id);
    }

    pub fn set_object_transform(
        &mut self,
        object_id: ObjectId,
        translation: Vec3,
        rotation: Quat,
        scale: Vec3,
    ) {
        if let Some(object) = self.objects.get_mut(object_id) {
            object.transform.set_transform(translation, rotation, scale);
        }
        self.invalidate_object_hierarchy(object_id);
    }

    pub fn get_object_transform(&self, object_id: ObjectId) -> Option<&Transform> {
        self.objects.get(object_id).map(|object| &object.transform)
    }

    /// World matrix as of the last `late_update`.
    pub fn world_matrix(&self, object_id: ObjectId) -> Option<Mat4> {
        self.objects
            .get(object_id)
            .map(|object| *object.transform.get_world_matrix())
    }

    pub fn early_update(&mut self) {
        for (_, object) in self.objects.iter() {
            object.transform.reset_flags();
        }
    }

    pub fn late_update(&mut self) {
        self.update_transforms();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
