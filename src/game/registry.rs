// Live object registry and the deferred command queue
//
// The registry owns every active object in spawn order. Structural changes
// requested while systems are iterating go through `CommandQueue` and are
// applied once per frame, after iteration has finished.

use super::object::{GameObject, ObjectId, ObjectKind, Role};

/// The in-memory collection of all active simulation objects
#[derive(Debug, Default)]
pub struct LiveRegistry {
    objects: Vec<GameObject>,
    next_id: u64,
}

impl LiveRegistry {
    pub fn new() -> Self {
        LiveRegistry {
            objects: Vec::new(),
            next_id: 1,
        }
    }

    /// Gives `object` a fresh id if it has none yet and returns its id.
    ///
    /// Ids can be reserved before the object is queued for spawning, so a
    /// parent and its dependents can reference each other up front.
    pub fn assign_id(&mut self, object: &mut GameObject) -> ObjectId {
        if !object.id.is_assigned() {
            // Default-constructed registries start at 0, which is UNASSIGNED
            self.next_id = self.next_id.max(1);
            object.id = ObjectId(self.next_id);
            self.next_id += 1;
        }
        object.id
    }

    /// Registers an object immediately. Only call this outside iteration;
    /// systems use `CommandQueue::spawn`.
    pub fn insert(&mut self, mut object: GameObject) -> ObjectId {
        let id = self.assign_id(&mut object);
        self.objects.push(object);
        id
    }

    /// Removes an object. Removing a tower also removes its head.
    pub fn remove(&mut self, id: ObjectId) -> Option<GameObject> {
        let index = self.objects.iter().position(|o| o.id == id)?;
        let removed = self.objects.remove(index);
        if let ObjectKind::Tower(tower) = &removed.kind {
            self.remove_heads_of(&[removed.id]);
            // Heads registered without a back-link are still found through the tower
            if let Some(head) = tower.head {
                self.objects.retain(|o| o.id != head);
            }
        }
        Some(removed)
    }

    /// Removes every object whose role is in `roles`, plus the heads of any
    /// removed towers. Returns how many objects were removed.
    pub fn remove_roles(&mut self, roles: &[Role]) -> usize {
        let before = self.objects.len();
        let mut removed_towers = Vec::new();

        self.objects.retain(|object| {
            let remove = roles.contains(&object.role());
            if remove && object.role() == Role::Tower {
                removed_towers.push(object.id);
            }
            !remove
        });

        if !removed_towers.is_empty() {
            self.remove_heads_of(&removed_towers);
        }

        before - self.objects.len()
    }

    fn remove_heads_of(&mut self, towers: &[ObjectId]) {
        self.objects.retain(|object| match &object.kind {
            ObjectKind::TowerHead(head) => !towers.contains(&head.parent),
            _ => true,
        });
    }

    pub fn get(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameObject> {
        self.objects.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut GameObject> {
        self.objects.iter_mut()
    }

    pub fn with_role(&self, role: Role) -> impl Iterator<Item = &GameObject> {
        self.objects.iter().filter(move |o| o.role() == role)
    }

    pub fn count(&self, role: Role) -> usize {
        self.with_role(role).count()
    }

    /// First object with the given role, in spawn order
    pub fn first_id(&self, role: Role) -> Option<ObjectId> {
        self.with_role(role).next().map(|o| o.id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// A structural change to the registry, deferred until the frame's
/// iteration is over
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Spawn(GameObject),
    Despawn(ObjectId),
    /// Evaluated when applied, so it sees objects spawned by earlier commands
    DespawnRoles(Vec<Role>),
}

/// Same-thread FIFO of pending registry mutations
#[derive(Debug, Default)]
pub struct CommandQueue {
    commands: Vec<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        CommandQueue::default()
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn spawn(&mut self, object: GameObject) {
        self.push(Command::Spawn(object));
    }

    pub fn despawn(&mut self, id: ObjectId) {
        self.push(Command::Despawn(id));
    }

    pub fn despawn_roles(&mut self, roles: &[Role]) {
        self.push(Command::DespawnRoles(roles.to_vec()));
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn pending(&self) -> &[Command] {
        &self.commands
    }

    /// First object with `role` that is queued to spawn but not yet in the registry
    pub fn queued_spawn_mut(&mut self, role: Role) -> Option<&mut GameObject> {
        self.commands.iter_mut().find_map(|command| match command {
            Command::Spawn(object) if object.role() == role => Some(object),
            _ => None,
        })
    }

    /// Applies every queued command in order and empties the queue.
    ///
    /// Returns the number of commands applied.
    pub fn apply(&mut self, registry: &mut LiveRegistry) -> usize {
        let applied = self.commands.len();
        for command in self.commands.drain(..) {
            match command {
                Command::Spawn(object) => {
                    registry.insert(object);
                }
                Command::Despawn(id) => {
                    // Already gone (e.g. killed and despawned twice) is fine
                    registry.remove(id);
                }
                Command::DespawnRoles(roles) => {
                    registry.remove_roles(&roles);
                }
            }
        }
        applied
    }
}
