//! School upkeep: when a leader dies, its followers are promoted or
//! disbanded per the configured policy.

use glam::Vec2;
use hecs::{Entity, World};
use log::debug;

use arena_core::components::{Dead, SchoolLeader, SchoolMember};
use arena_core::enums::SchoolPolicy;
use arena_core::events::DirectorEvent;

use crate::context::handle_of;

pub fn run(world: &mut World, policy: SchoolPolicy, events: &mut Vec<DirectorEvent>) {
    let fallen: Vec<(Entity, u32)> = world
        .query::<(&SchoolLeader, &Dead)>()
        .iter()
        .map(|(entity, (leader, _))| (entity, leader.school_id))
        .collect();

    for (leader, school_id) in fallen {
        let _ = world.remove_one::<SchoolLeader>(leader);

        let mut followers: Vec<(Entity, Vec2)> = world
            .query::<(&SchoolMember, Option<&Dead>)>()
            .iter()
            .filter(|(_, (member, dead))| member.school_id == school_id && dead.is_none())
            .map(|(entity, (member, _))| (entity, member.offset))
            .collect();
        followers.sort_by_key(|(entity, _)| entity.to_bits());

        let promoted = match policy {
            SchoolPolicy::Promote => followers
                .iter()
                .copied()
                .min_by(|a, b| a.1.length_squared().total_cmp(&b.1.length_squared())),
            SchoolPolicy::Disband => None,
        };

        match promoted {
            Some((new_leader, center)) => {
                let _ = world.remove_one::<SchoolMember>(new_leader);
                let _ = world.insert_one(new_leader, SchoolLeader { school_id });
                for (entity, _) in followers.iter().filter(|(e, _)| *e != new_leader) {
                    if let Ok(mut member) = world.get::<&mut SchoolMember>(*entity) {
                        member.offset -= center;
                    }
                }
                debug!("school {} promoted a new leader", school_id);
                events.push(DirectorEvent::SchoolLeaderPromoted {
                    school_id,
                    leader: handle_of(new_leader),
                });
            }
            None => {
                for (entity, _) in &followers {
                    let _ = world.remove_one::<SchoolMember>(*entity);
                }
                debug!("school {} disbanded", school_id);
                events.push(DirectorEvent::SchoolDisbanded { school_id });
            }
        }
    }
}
