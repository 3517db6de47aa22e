//! Scan stage - contributes the discoverable units of assemblies.

use mapweave_core::MapConfig;
use serde::Serialize;

use crate::{
    Assembly, BuildError, ScanError, UnitKind,
    pipeline::{BuildContext, Diagnostic, Stage},
};

/// Units contributed by one assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssemblySummary {
    /// The scanned assembly.
    pub assembly: Assembly,
    /// Declarative registrars that ran.
    pub registrars: usize,
    /// `MapFrom` closings that ran.
    pub map_from: usize,
}

impl AssemblySummary {
    /// Total contributions from this assembly.
    pub fn contributions(&self) -> usize {
        self.registrars + self.map_from
    }
}

/// Units contributed by a scan, per assembly in scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ScanSummary {
    /// One entry per scanned assembly.
    pub assemblies: Vec<AssemblySummary>,
}

impl ScanSummary {
    /// Total contributions over every scanned assembly.
    pub fn contributions(&self) -> usize {
        self.assemblies.iter().map(AssemblySummary::contributions).sum()
    }

    /// Scanned assemblies that had nothing to contribute.
    pub fn empty(&self) -> impl Iterator<Item = &Assembly> {
        self.assemblies
            .iter()
            .filter(|summary| summary.contributions() == 0)
            .map(|summary| &summary.assembly)
    }
}

/// Run every registrar and `MapFrom` closing linked under `assemblies`.
///
/// Within an assembly, units run sorted by implementing type name. An
/// assembly without units contributes nothing.
///
/// # Errors
///
/// The first unit that fails to register aborts the scan with a
/// [`ScanError`] naming the unit and its assembly.
pub fn scan<'a>(
    config: &mut MapConfig,
    assemblies: impl IntoIterator<Item = &'a Assembly>,
) -> Result<ScanSummary, ScanError> {
    let mut summary = ScanSummary::default();

    for assembly in assemblies {
        let mut units: Vec<_> = assembly.units().collect();
        units.sort_by_key(|unit| unit.type_name());

        let mut registrars = 0;
        let mut map_from = 0;
        for unit in units {
            tracing::trace!(assembly = %assembly, unit = unit.type_name(), "contributing unit");
            unit.contribute(config).map_err(|source| ScanError {
                assembly: assembly.name().to_string(),
                unit: unit.type_name(),
                source,
            })?;
            match unit.kind() {
                UnitKind::Registrar => registrars += 1,
                UnitKind::MapFrom { .. } => map_from += 1,
            }
        }

        tracing::debug!(assembly = %assembly, registrars, map_from, "scanned assembly");
        summary.assemblies.push(AssemblySummary {
            assembly: assembly.clone(),
            registrars,
            map_from,
        });
    }

    Ok(summary)
}

/// Stage that scans the options' assemblies.
pub struct ScanStage;

impl Stage for ScanStage {
    fn name(&self) -> &'static str {
        "scan"
    }

    fn description(&self) -> &'static str {
        "Contribute registrars and MapFrom closings from assemblies"
    }

    fn skip_reason(&self, ctx: &BuildContext<'_>) -> Option<&'static str> {
        if !ctx.actions.scan_assemblies {
            Some("scan not requested")
        } else if ctx.options.assemblies.is_empty() {
            Some("no assemblies")
        } else {
            None
        }
    }

    fn run(&self, ctx: &mut BuildContext<'_>) -> Result<(), BuildError> {
        let summary = scan(ctx.config, &ctx.options.assemblies)?;

        for assembly in summary.empty() {
            ctx.report.diagnostics.push(
                Diagnostic::info(self.name(), "assembly has no linked units")
                    .about(assembly.name()),
            );
        }
        ctx.report.scan = summary;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mapweave_core::{ConfigError, TypePair};

    use super::*;
    use crate::{MapFrom, Register};

    struct Order;
    struct OrderDto;

    #[derive(Default)]
    struct OrderLine;

    #[derive(Default)]
    struct OrderRegistrar;

    impl Register for OrderRegistrar {
        fn register(&self, config: &mut MapConfig) -> Result<(), ConfigError> {
            config.register(|_: &Order| OrderDto)
        }
    }

    impl MapFrom<Order> for OrderLine {
        fn configure_mapping(&self, config: &mut MapConfig) -> Result<(), ConfigError> {
            config.register(|_: &Order| OrderLine)
        }
    }

    impl MapFrom<OrderDto> for OrderLine {
        fn configure_mapping(&self, config: &mut MapConfig) -> Result<(), ConfigError> {
            config.register(|_: &OrderDto| OrderLine)
        }
    }

    #[derive(Default)]
    struct Refusing;

    impl Register for Refusing {
        fn register(&self, _config: &mut MapConfig) -> Result<(), ConfigError> {
            Err(ConfigError::contribution("refused"))
        }
    }

    crate::register!(OrderRegistrar, assembly = "scan-tests");
    crate::map_from!(Order => OrderLine, assembly = "scan-tests");
    crate::map_from!(OrderDto => OrderLine, assembly = "scan-tests");
    crate::register!(Refusing, assembly = "scan-tests-refusing");

    #[test]
    fn test_scan_contributes_every_unit() {
        let mut config = MapConfig::new();
        let assemblies = [Assembly::named("scan-tests")];

        let summary = scan(&mut config, &assemblies).expect("scan should succeed");

        assert_eq!(summary.assemblies.len(), 1);
        assert_eq!(summary.assemblies[0].registrars, 1);
        assert_eq!(summary.assemblies[0].map_from, 2);
        assert!(config.contains(TypePair::of::<Order, OrderDto>()));
        assert!(config.contains(TypePair::of::<Order, OrderLine>()));
        assert!(config.contains(TypePair::of::<OrderDto, OrderLine>()));
    }

    #[test]
    fn test_empty_assembly_is_a_no_op() {
        let mut config = MapConfig::new();
        let assemblies = [Assembly::named("scan-tests-nothing-here")];

        let summary = scan(&mut config, &assemblies).expect("scan should succeed");

        assert!(config.is_empty());
        assert_eq!(summary.contributions(), 0);
        assert_eq!(summary.empty().count(), 1);
    }

    #[test]
    fn test_failing_unit_names_unit_and_assembly() {
        let mut config = MapConfig::new();
        let assemblies = [Assembly::named("scan-tests-refusing")];

        let err = scan(&mut config, &assemblies).unwrap_err();

        assert_eq!(err.assembly, "scan-tests-refusing");
        assert!(err.unit.ends_with("Refusing"));
        assert!(matches!(err.source, ConfigError::Contribution { .. }));
    }
}
