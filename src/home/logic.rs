//! Daily upkeep, recovery and upgrades for the character's home.

use super::types::{HomeDefinition, HomeError, HomeProperties, UpkeepOutcome};
use crate::character::ledger::Character;
use crate::core::config::HomeConfig;
use crate::core::constants::UPKEEP_HEALTH_PENALTY;
use crate::log::{LogService, LogTopic};

#[derive(Debug, Clone)]
pub struct Home {
    ladder: Vec<HomeDefinition>,
    starting: usize,
    current: usize,
    pause_on_failure: bool,
    pub missed_upkeep_days: u64,
}

impl Home {
    /// Builds the home from configuration. An empty ladder or an unknown
    /// starting home is fatal.
    pub fn new(config: &HomeConfig) -> Result<Self, HomeError> {
        if config.homes.is_empty() {
            return Err(HomeError::EmptyLadder);
        }
        let starting = config
            .homes
            .iter()
            .position(|h| h.name == config.starting_home)
            .ok_or_else(|| HomeError::UnknownStartingHome(config.starting_home.clone()))?;

        Ok(Self {
            ladder: config.homes.clone(),
            starting,
            current: starting,
            pause_on_failure: config.pause_on_upkeep_failure,
            missed_upkeep_days: 0,
        })
    }

    pub fn current(&self) -> &HomeDefinition {
        &self.ladder[self.current]
    }

    pub fn next(&self) -> Option<&HomeDefinition> {
        self.ladder.get(self.current + 1)
    }

    pub fn ladder(&self) -> &[HomeDefinition] {
        &self.ladder
    }

    /// Sets the character's daily recovery from the current home.
    pub fn apply_recovery(&self, character: &mut Character) {
        let home = self.current();
        character.status.health.tick_recovery = home.health_recovery;
        character.status.stamina.tick_recovery = home.stamina_recovery;
    }

    /// Charges the day's upkeep.
    pub fn on_day(&mut self, character: &mut Character, log: &mut LogService) -> UpkeepOutcome {
        let upkeep = self.current().upkeep;
        if character.money >= upkeep {
            character.update_money(-upkeep, true);
            return UpkeepOutcome::Paid;
        }

        self.missed_upkeep_days += 1;
        character.status.health.value -= UPKEEP_HEALTH_PENALTY;
        character.check_overage();
        log.injury(
            LogTopic::Home,
            format!(
                "You can't pay the upkeep on your {}. A cold, hungry night leaves you hurting.",
                self.current().name
            ),
        );
        tracing::warn!(
            home = %self.current().name,
            upkeep,
            money = character.money,
            "upkeep shortfall"
        );
        UpkeepOutcome::Shortfall {
            pause_requested: self.pause_on_failure,
        }
    }

    /// Buys the next home on the ladder. Returns false if there is none or
    /// it is unaffordable.
    pub fn upgrade(&mut self, character: &mut Character, log: &mut LogService) -> bool {
        let Some(next) = self.next().cloned() else {
            return false;
        };
        if character.money < next.cost {
            log.log(
                LogTopic::Home,
                format!("You can't afford the {} yet.", next.name),
            );
            return false;
        }
        character.update_money(-next.cost, true);
        self.current += 1;
        self.apply_recovery(character);
        log.log(LogTopic::Home, format!("You move into a {}.", next.name));
        true
    }

    /// Every life starts back in the configured starting home.
    pub fn reincarnate(&mut self, character: &mut Character) {
        self.current = self.starting;
        self.missed_upkeep_days = 0;
        self.apply_recovery(character);
    }

    pub fn properties(&self) -> HomeProperties {
        HomeProperties {
            current_home: self.current().name.clone(),
            missed_upkeep_days: self.missed_upkeep_days,
        }
    }

    /// Restores saved state. A home no longer in the ladder leaves the
    /// current home unchanged.
    pub fn set_properties(&mut self, properties: HomeProperties, character: &mut Character) {
        match self
            .ladder
            .iter()
            .position(|h| h.name == properties.current_home)
        {
            Some(index) => self.current = index,
            None if properties.current_home.is_empty() => {}
            None => tracing::warn!(
                home = %properties.current_home,
                "saved home not in ladder, keeping current"
            ),
        }
        self.missed_upkeep_days = properties.missed_upkeep_days;
        self.apply_recovery(character);
    }
}
