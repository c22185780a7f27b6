//! Followers: hired hands who work for a daily wage.
//!
//! Each day wages are paid and jobs produce goods. Each year (as carried by
//! the year tick) followers age and those past their lifespan retire.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::character::ledger::Character;
use crate::core::config::FollowersConfig;
use crate::core::constants::*;
use crate::items::inventory::Inventory;
use crate::items::repository::ItemRepository;
use crate::items::types::{Item, ItemKind};
use crate::log::{LogService, LogTopic};

const FOLLOWER_NAMES: [&str; 12] = [
    "Ah Fu", "Bao", "Chun", "Dewei", "Fang", "Guo", "Hui", "Jin", "Lan", "Mei", "Ping", "Wen",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FollowerJob {
    Hunter,
    Prospector,
    Merchant,
}

impl FollowerJob {
    pub fn all() -> [FollowerJob; 3] {
        [
            FollowerJob::Hunter,
            FollowerJob::Prospector,
            FollowerJob::Merchant,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            FollowerJob::Hunter => "hunter",
            FollowerJob::Prospector => "prospector",
            FollowerJob::Merchant => "merchant",
        }
    }

    /// Item produced each day, if the job produces goods.
    fn product(&self) -> Option<&'static str> {
        match self {
            FollowerJob::Hunter => Some("meat"),
            FollowerJob::Prospector => Some("ironOre"),
            FollowerJob::Merchant => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Follower {
    pub name: String,
    /// Age in days.
    pub age: u32,
    /// Lifespan in days.
    pub lifespan: u32,
    pub job: FollowerJob,
    /// Scales daily output.
    pub power: f64,
}

/// Persisted roster state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowersProperties {
    pub roster: Vec<Follower>,
    pub total_hired: u64,
}

#[derive(Debug, Clone)]
pub struct Followers {
    /// Hiring order, oldest hire first.
    pub roster: Vec<Follower>,
    pub total_hired: u64,
    max_followers: u32,
    wage: f64,
}

impl Default for Followers {
    fn default() -> Self {
        Self::new(&FollowersConfig::default())
    }
}

impl Followers {
    pub fn new(config: &FollowersConfig) -> Self {
        Self {
            roster: Vec::new(),
            total_hired: 0,
            max_followers: config.max_followers,
            wage: config.wage,
        }
    }

    pub fn len(&self) -> usize {
        self.roster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    pub fn daily_wages(&self) -> f64 {
        self.wage * self.roster.len() as f64
    }

    /// Hires a new follower for `job`. Fails quietly when the roster is full.
    pub fn hire(
        &mut self,
        job: FollowerJob,
        rng: &mut dyn RngCore,
        log: &mut LogService,
    ) -> Option<&Follower> {
        if self.roster.len() >= self.max_followers as usize {
            log.log(
                LogTopic::Followers,
                "You can't support any more followers.",
            );
            return None;
        }

        let name = FOLLOWER_NAMES[rng.gen_range(0..FOLLOWER_NAMES.len())];
        let age = FOLLOWER_HIRE_AGE_YEARS * DAYS_PER_YEAR + rng.gen_range(0..DAYS_PER_YEAR * 4);
        let lifespan = rng.gen_range(FOLLOWER_MIN_LIFESPAN_YEARS..=FOLLOWER_MAX_LIFESPAN_YEARS)
            * DAYS_PER_YEAR;
        let follower = Follower {
            name: name.to_string(),
            age,
            lifespan,
            job,
            power: 1.0 + rng.gen::<f64>(),
        };

        log.log(
            LogTopic::Followers,
            format!("{} joins you as a {}.", follower.name, job.name()),
        );
        self.total_hired += 1;
        self.roster.push(follower);
        self.roster.last()
    }

    /// Sends the youngest follower away. Returns who left, if anyone.
    pub fn dismiss_youngest(&mut self, log: &mut LogService) -> Option<Follower> {
        let index = self
            .roster
            .iter()
            .enumerate()
            .min_by_key(|(_, f)| f.age)
            .map(|(i, _)| i)?;
        let follower = self.roster.remove(index);
        log.log(
            LogTopic::Followers,
            format!("{} loses faith in you and leaves.", follower.name),
        );
        Some(follower)
    }

    /// Pays wages, then puts everyone who stayed to work.
    pub fn on_day(
        &mut self,
        character: &mut Character,
        inventory: &mut Inventory,
        items: &ItemRepository,
        log: &mut LogService,
    ) {
        while !self.roster.is_empty() && character.money < self.daily_wages() {
            if let Some(follower) = self.roster.pop() {
                log.log(
                    LogTopic::Followers,
                    format!("You can't pay {}, who leaves your service.", follower.name),
                );
            }
        }
        if self.roster.is_empty() {
            return;
        }
        character.update_money(-self.daily_wages(), true);

        for follower in &self.roster {
            let output = follower.power.floor().max(1.0);
            match follower.job.product() {
                Some(id) => {
                    let item = items
                        .get_item_by_id(id)
                        .cloned()
                        .unwrap_or_else(|| Item::new(id, id, ItemKind::Ingredient));
                    inventory.add_item(&item, output as u32);
                }
                None => character.update_money(output * self.wage * 2.0, false),
            }
        }
    }

    /// Ages everyone by `days` and retires those past their lifespan.
    pub fn on_year(&mut self, days: u32, log: &mut LogService) {
        for index in (0..self.roster.len()).rev() {
            let follower = &mut self.roster[index];
            follower.age = follower.age.saturating_add(days);
            if follower.age >= follower.lifespan {
                let retired = self.roster.remove(index);
                log.log(
                    LogTopic::Followers,
                    format!("{} has grown old and retires.", retired.name),
                );
            }
        }
    }

    pub fn reincarnate(&mut self) {
        self.roster.clear();
    }

    pub fn properties(&self) -> FollowersProperties {
        FollowersProperties {
            roster: self.roster.clone(),
            total_hired: self.total_hired,
        }
    }

    pub fn set_properties(&mut self, properties: FollowersProperties) {
        self.roster = properties.roster;
        self.total_hired = properties.total_hired;
    }
}
