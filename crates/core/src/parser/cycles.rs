//! Cycle classification for the Perry Rhodan series.
//!
//! Issue numbers map onto named narrative arcs ("cycles") through an ordered
//! table of inclusive ranges. The table is not evenly spaced and is not
//! gapless: 1749-1799 is deliberately uncovered, as is everything past 2699.

/// Ordered `(low, high, cycle)` table with inclusive bounds.
///
/// Classification is a first-match-wins scan, so a hypothetical overlap
/// between adjacent entries resolves to the earlier one.
const CYCLES: &[(u32, u32, &str)] = &[
    (1, 49, "Die Dritte Macht"),
    (50, 99, "Atlan und Arkon"),
    (100, 149, "Die Posbis"),
    (150, 199, "Das Zweite Imperium"),
    (200, 299, "Die Meister der Insel"),
    (300, 399, "M 87"),
    (400, 499, "Die Cappins"),
    (500, 569, "Der Schwarm"),
    (570, 599, "Die Altmutanten"),
    (600, 649, "Das Kosmische Schachspiel"),
    (650, 699, "Das Konzil"),
    (700, 799, "Aphilie"),
    (800, 867, "Bardioc"),
    (868, 899, "PAN-THAU-RA"),
    (900, 999, "Die Kosmischen Burgen"),
    (1000, 1099, "Die Kosmische Hanse"),
    (1100, 1199, "Die Endlose Armada"),
    (1200, 1299, "Chronofossilien Vironauten"),
    (1300, 1349, "Die Gänger des Netzes"),
    (1350, 1399, "Tarkan"),
    (1400, 1499, "Die Cantaro"),
    (1500, 1599, "Die Linguiden"),
    (1600, 1649, "Die Ennox"),
    (1650, 1699, "Die Große Leere"),
    (1700, 1748, "Die Ayindi"),
    (1800, 1875, "Die Tolkander"),
    (1876, 1899, "Die Heliotischen Bollwerke"),
    (1900, 1949, "Der Sechste Bote"),
    (1950, 1999, "MATERIA"),
    (2000, 2099, "Die Solare Residenz"),
    (2100, 2199, "Das Reich Tradom"),
    (2200, 2299, "Der Sternenozean"),
    (2300, 2399, "TERRANOVA"),
    (2400, 2499, "Negasphäre"),
    (2500, 2599, "Stardust"),
    (2600, 2699, "Neuroversum"),
];

/// Look up the cycle name for an issue number.
///
/// Pure and total: returns `None` for any index outside every range,
/// including the uncovered 1749-1799 stretch.
pub fn cycle_for_issue(issue: u32) -> Option<&'static str> {
    CYCLES
        .iter()
        .find(|(low, high, _)| (*low..=*high).contains(&issue))
        .map(|(_, _, name)| *name)
}
