//! Fields of crops that grow a little every day and are harvested into the
//! inventory when ripe.

use serde::{Deserialize, Serialize};

use crate::core::config::FarmConfig;
use crate::items::inventory::Inventory;
use crate::items::repository::ItemRepository;
use crate::items::types::{Item, ItemKind};
use crate::log::{LogService, LogTopic};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Crop {
    Rice,
    Cabbage,
    Ginseng,
}

impl Crop {
    pub fn name(&self) -> &'static str {
        match self {
            Crop::Rice => "rice",
            Crop::Cabbage => "cabbage",
            Crop::Ginseng => "ginseng",
        }
    }

    pub fn item_id(&self) -> &'static str {
        match self {
            Crop::Rice => "rice",
            Crop::Cabbage => "cabbage",
            Crop::Ginseng => "ginseng",
        }
    }

    /// Days from planting to harvest.
    pub fn days_to_grow(&self) -> u32 {
        match self {
            Crop::Rice => 30,
            Crop::Cabbage => 45,
            Crop::Ginseng => 365,
        }
    }

    pub fn yield_per_harvest(&self) -> u32 {
        match self {
            Crop::Rice => 20,
            Crop::Cabbage => 15,
            Crop::Ginseng => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub crop: Crop,
    pub days_grown: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmProperties {
    pub fields: Vec<Field>,
    pub total_harvested: u64,
}

#[derive(Debug, Clone)]
pub struct Farm {
    pub fields: Vec<Field>,
    pub total_harvested: u64,
    max_fields: u32,
}

impl Default for Farm {
    fn default() -> Self {
        Self::new(&FarmConfig::default())
    }
}

impl Farm {
    pub fn new(config: &FarmConfig) -> Self {
        Self {
            fields: Vec::new(),
            total_harvested: 0,
            max_fields: config.max_fields,
        }
    }

    /// Plows a new field and plants `crop`. Returns false when out of land.
    pub fn plow(&mut self, crop: Crop, log: &mut LogService) -> bool {
        if self.fields.len() >= self.max_fields as usize {
            log.log(LogTopic::Farming, "You have no more land to plow.");
            return false;
        }
        self.fields.push(Field {
            crop,
            days_grown: 0,
        });
        log.log(
            LogTopic::Farming,
            format!("You plow a new field and plant {}.", crop.name()),
        );
        true
    }

    /// Grows every field by a day. Ripe fields are harvested and replanted.
    pub fn on_day(&mut self, inventory: &mut Inventory, items: &ItemRepository, log: &mut LogService) {
        for field in self.fields.iter_mut() {
            field.days_grown += 1;
            if field.days_grown < field.crop.days_to_grow() {
                continue;
            }
            let id = field.crop.item_id();
            let item = items
                .get_item_by_id(id)
                .cloned()
                .unwrap_or_else(|| Item::new(id, id, ItemKind::Food));
            let quantity = field.crop.yield_per_harvest();
            inventory.add_item(&item, quantity);
            self.total_harvested += quantity as u64;
            field.days_grown = 0;
            log.log(
                LogTopic::Farming,
                format!("You harvest {} {}.", quantity, item.name),
            );
        }
    }

    pub fn reincarnate(&mut self) {
        self.fields.clear();
    }

    pub fn properties(&self) -> FarmProperties {
        FarmProperties {
            fields: self.fields.clone(),
            total_harvested: self.total_harvested,
        }
    }

    pub fn set_properties(&mut self, properties: FarmProperties) {
        self.fields = properties.fields;
        self.total_harvested = properties.total_harvested;
    }
}
