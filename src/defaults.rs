use bollard::models::HostConfig;

// ======================================================
// DAEMON-SIDE DEFAULTS
// ======================================================
//
// A field that still holds its daemon default produces no flag.
// Keeping these in one place makes the translation table auditable.

pub const NETWORK_MODE_DEFAULT: &str = "default";
pub const LOG_DRIVER_DEFAULT: &str = "json-file";
pub const SHM_SIZE_DEFAULT: i64 = 67_108_864;

/// `MemorySwappiness` uses -1 as its unset sentinel; 0 is a real setting.
pub const MEMORY_SWAPPINESS_UNSET: i64 = -1;

// ======================================================
// NUMERIC RESOURCE FIELDS
// ======================================================

pub enum NumberStyle {
    /// Human-readable binary units ("128MiB").
    Bytes,
    /// Plain decimal.
    Plain,
}

pub struct NumericField {
    pub flag: &'static str,
    pub unset: i64,
    pub style: NumberStyle,
    pub get: fn(&HostConfig) -> Option<i64>,
}

/// The contiguous memory/CPU block, in emission order.
pub const RESOURCE_FIELDS: &[NumericField] = &[
    NumericField {
        flag: "--memory",
        unset: 0,
        style: NumberStyle::Bytes,
        get: |host| host.memory,
    },
    NumericField {
        flag: "--memory-reservation",
        unset: 0,
        style: NumberStyle::Bytes,
        get: |host| host.memory_reservation,
    },
    NumericField {
        flag: "--memory-swap",
        unset: 0,
        style: NumberStyle::Bytes,
        get: |host| host.memory_swap,
    },
    NumericField {
        flag: "--memory-swappiness",
        unset: MEMORY_SWAPPINESS_UNSET,
        style: NumberStyle::Plain,
        get: |host| host.memory_swappiness,
    },
    NumericField {
        flag: "--kernel-memory",
        unset: 0,
        style: NumberStyle::Bytes,
        get: |host| host.kernel_memory,
    },
    NumericField {
        flag: "--cpu-period",
        unset: 0,
        style: NumberStyle::Plain,
        get: |host| host.cpu_period,
    },
    NumericField {
        flag: "--cpu-quota",
        unset: 0,
        style: NumberStyle::Plain,
        get: |host| host.cpu_quota,
    },
    NumericField {
        flag: "--cpu-shares",
        unset: 0,
        style: NumberStyle::Plain,
        get: |host| host.cpu_shares,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_fields_read_their_host_config_columns() {
        let host = HostConfig {
            memory: Some(1),
            memory_reservation: Some(2),
            memory_swap: Some(3),
            memory_swappiness: Some(4),
            kernel_memory: Some(5),
            cpu_period: Some(6),
            cpu_quota: Some(7),
            cpu_shares: Some(8),
            ..Default::default()
        };

        let values: Vec<Option<i64>> =
            RESOURCE_FIELDS.iter().map(|f| (f.get)(&host)).collect();

        assert_eq!(
            values,
            vec![
                Some(1),
                Some(2),
                Some(3),
                Some(4),
                Some(5),
                Some(6),
                Some(7),
                Some(8)
            ]
        );
    }

    #[test]
    fn swappiness_is_the_only_field_with_a_negative_sentinel() {
        for field in RESOURCE_FIELDS {
            if field.flag == "--memory-swappiness" {
                assert_eq!(field.unset, MEMORY_SWAPPINESS_UNSET);
            } else {
                assert_eq!(field.unset, 0);
            }
        }
    }
}
