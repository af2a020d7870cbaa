//! Headless driver: one scene, many walkers, fixed ticks.

use roam_core::TickContext;
use roam_map::SceneMap;
use roam_nav::{Vec2, Vec3};
use serde::Serialize;
use tracing::info;

use crate::behavior::BehaviorKind;
use crate::character::Character;
use crate::config::SimConfig;
use crate::error::Result;
use crate::player::PlayerCharacter;
use crate::walker::{Walker, DEFAULT_DRAW_HEIGHT};

/// What a renderer reads once per frame for one agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSnapshot {
    pub id: String,
    pub name: String,
    pub color: String,
    pub position: Vec3,
    pub facing: Vec2,
    pub room: String,
    pub behavior: Option<BehaviorKind>,
}

#[derive(Debug, Clone)]
pub struct Simulation {
    seed: u64,
    tick: u64,
    elapsed: f64,
    scene: SceneMap,
    characters: Vec<Character>,
    player: Option<PlayerCharacter>,
}

impl Simulation {
    /// Build the scene and place every character. Characters update in
    /// ascending id order regardless of roster order.
    pub fn new(config: &SimConfig) -> Result<Self> {
        config.validate()?;
        let scene = SceneMap::build(&config.scene)?;

        let mut roster = config.characters.clone();
        roster.sort_by(|a, b| a.id.cmp(&b.id));
        let mut characters: Vec<Character> = roster
            .iter()
            .map(|c| Character::new(c, config.behavior, config.seed))
            .collect();
        for character in &mut characters {
            character.initialize(&scene);
        }

        let player = config.player.as_ref().map(|p| {
            let mut player = PlayerCharacter::new(p, config.seed);
            player.initialize(&scene);
            player
        });

        info!(
            rooms = scene.rooms().len(),
            corridors = scene.corridors().len(),
            characters = characters.len(),
            seed = config.seed,
            "simulation ready"
        );

        Ok(Self {
            seed: config.seed,
            tick: 0,
            elapsed: 0.0,
            scene,
            characters,
            player,
        })
    }

    pub fn step(&mut self, dt_seconds: f32) {
        let ctx = TickContext::new(self.tick, dt_seconds, self.seed);
        for character in &mut self.characters {
            character.update(&ctx, &self.scene);
        }
        if let Some(player) = &mut self.player {
            player.update(&ctx, &self.scene);
        }
        self.tick += 1;
        self.elapsed += f64::from(ctx.dt());
    }

    pub fn run(&mut self, ticks: u64, dt_seconds: f32) {
        for _ in 0..ticks {
            self.step(dt_seconds);
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed
    }

    pub fn scene(&self) -> &SceneMap {
        &self.scene
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn character(&self, id: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.id() == id)
    }

    pub fn player(&self) -> Option<&PlayerCharacter> {
        self.player.as_ref()
    }

    /// Feed direction input to the player. False without a player or when
    /// the step was blocked.
    pub fn player_move(&mut self, direction: Vec2, dt_seconds: f32) -> bool {
        match &mut self.player {
            Some(player) => player.move_in_direction(direction, dt_seconds, &self.scene),
            None => false,
        }
    }

    /// Click-to-move for the player.
    pub fn player_target(&mut self, target: Vec2) -> bool {
        match &mut self.player {
            Some(player) => player.set_target_position(target, &self.scene),
            None => false,
        }
    }

    pub fn snapshots(&self) -> Vec<AgentSnapshot> {
        let mut out: Vec<AgentSnapshot> = self
            .characters
            .iter()
            .map(|c| AgentSnapshot {
                id: c.id().to_string(),
                name: c.name().to_string(),
                color: c.color().to_string(),
                position: c.position_3d(DEFAULT_DRAW_HEIGHT),
                facing: c.facing(),
                room: c.current_room().to_string(),
                behavior: c.behavior().map(|b| b.kind()),
            })
            .collect();
        if let Some(player) = &self.player {
            out.push(AgentSnapshot {
                id: player.id().to_string(),
                name: player.name().to_string(),
                color: player.color().to_string(),
                position: player.position_3d(DEFAULT_DRAW_HEIGHT),
                facing: player.facing(),
                room: player.current_room().to_string(),
                behavior: None,
            });
        }
        out
    }
}
