// crates/wt_physics/src/application.rs

//! 透射系数作用于谱
//!
//! 能量与波幅平方成正比，因此每个位置的方差密度乘以该位置的 Kt²。
//! 缩放逐位置独立进行，不是全局标量。

use tracing::debug;
use wt_core::VarianceSpectrum;
use wt_foundation::WtResult;

use crate::transmission::DoorTransmission;

/// 原地缩放：结果对应位置的方差密度乘以 Kt²
pub fn apply_transmission(
    spectrum: &mut VarianceSpectrum,
    results: &[DoorTransmission],
) -> WtResult<()> {
    for result in results {
        spectrum.scale_location(result.location, result.energy_factor())?;
        debug!(
            "位置 {} ({}): 能量乘以 Kt²={:.4}",
            result.location,
            result.name,
            result.energy_factor()
        );
    }
    Ok(())
}

/// 返回缩放后的新谱，输入不变
pub fn transmitted_spectrum(
    spectrum: &VarianceSpectrum,
    results: &[DoorTransmission],
) -> WtResult<VarianceSpectrum> {
    let mut out = spectrum.clone();
    apply_transmission(&mut out, results)?;
    Ok(out)
}

/// 每个闸门一个单位置子谱，已按该闸门的 Kt² 缩放
pub fn door_spectra(
    spectrum: &VarianceSpectrum,
    results: &[DoorTransmission],
) -> WtResult<Vec<VarianceSpectrum>> {
    results
        .iter()
        .map(|result| {
            let mut sub = spectrum.select_location(result.location)?;
            sub.scale_location(0, result.energy_factor())?;
            Ok(sub)
        })
        .collect()
}
