//! Bundled demo phylogeny.

/// One seed record: stable id, display name and the id of its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedTaxon<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub parent: Option<&'a str>,
}

impl<'a> SeedTaxon<'a> {
    pub const fn root(id: &'a str, name: &'a str) -> Self {
        Self {
            id,
            name,
            parent: None,
        }
    }

    pub const fn child(id: &'a str, name: &'a str, parent: &'a str) -> Self {
        Self {
            id,
            name,
            parent: Some(parent),
        }
    }
}

/// Amniota → Sauropsida/Synapsida → … → species, children in listing order.
pub const DINOSAUR_PHYLOGENY: &[SeedTaxon<'static>] = &[
    SeedTaxon::root("amniota", "Amniota"),
    SeedTaxon::child("sauropsida", "Sauropsida", "amniota"),
    SeedTaxon::child("synapsida", "Synapsida", "amniota"),
    SeedTaxon::child("dinosauria", "Dinosauria", "sauropsida"),
    SeedTaxon::child("psittacosauridae", "Psittacosauridae", "dinosauria"),
    SeedTaxon::child("velociraptorinae", "Velociraptorinae", "dinosauria"),
    SeedTaxon::child("tyrannosauridae", "Tyrannosauridae", "dinosauria"),
    SeedTaxon::child("genus_psittacosaurus", "Psittacosaurus", "psittacosauridae"),
    SeedTaxon::child("genus_velociraptor", "Velociraptor", "velociraptorinae"),
    SeedTaxon::child("tyrannosaurinae", "Tyrannosaurinae", "tyrannosauridae"),
    SeedTaxon::child("albertosaurinae", "Albertosaurinae", "tyrannosauridae"),
    SeedTaxon::child("genus_tyrannosaurus", "Tyrannosaurus", "tyrannosaurinae"),
    SeedTaxon::child("genus_tarbosaurus", "Tarbosaurus", "tyrannosaurinae"),
    SeedTaxon::child("genus_albertosaurus", "Albertosaurus", "albertosaurinae"),
    SeedTaxon::child(
        "psittacosaurus_mongoliensis",
        "Psittacosaurus mongoliensis",
        "genus_psittacosaurus",
    ),
    SeedTaxon::child(
        "velociraptor_mongoliensis",
        "Velociraptor mongoliensis",
        "genus_velociraptor",
    ),
    SeedTaxon::child(
        "velociraptor_osmolskae",
        "Velociraptor osmolskae",
        "genus_velociraptor",
    ),
    SeedTaxon::child("species_rex", "Tyrannosaurus rex", "genus_tyrannosaurus"),
    SeedTaxon::child(
        "species_mcraeensis",
        "Tyrannosaurus mcraeensis",
        "genus_tyrannosaurus",
    ),
    SeedTaxon::child("tarbosaurus_bataar", "Tarbosaurus Bataar", "genus_tarbosaurus"),
    SeedTaxon::child(
        "species_sarcophagus",
        "Albertosaurus sarcophagus",
        "genus_albertosaurus",
    ),
    SeedTaxon::child("hominidae", "Hominidae", "synapsida"),
    SeedTaxon::child("homo", "Homo", "hominidae"),
    SeedTaxon::child("homo_sapiens", "Homo sapiens", "homo"),
];
