use std::collections::HashMap;
use std::path::Path;

use bollard::models::{
    ContainerConfig, ContainerInspectResponse, HostConfig, ImageInspect, RestartPolicyNameEnum,
    ThrottleDevice,
};

use crate::defaults::{self, NumberStyle};
use crate::docker::InspectSource;
use crate::format::{human_size, ulimit};

// ======================================================
// ORCHESTRATION
// ======================================================

/// Fetch the two inspection records and render the equivalent `docker run`
/// line. The image is looked up by the ID the container reports, so the
/// reconstruction still works after the tag has moved.
pub async fn reconstruct_command(
    source: &impl InspectSource,
    name: &str,
) -> anyhow::Result<String> {
    let container = source.container(name).await?;

    let image_ref = container.image.clone().unwrap_or_default();
    let image = source.image(&image_ref).await?;

    Ok(reconstruct(&container, &image).join(" "))
}

// ======================================================
// FIELD-TO-FLAG TRANSLATION
// ======================================================

/// Map the two records to an ordered token sequence. Pure; every rule is an
/// independent default-comparison. Map-backed fields (labels, sysctls,
/// tmpfs, port bindings, ...) are emitted in sorted key order so the output
/// is stable across runs.
pub fn reconstruct(container: &ContainerInspectResponse, image: &ImageInspect) -> Vec<String> {
    let empty_config = ContainerConfig::default();
    let empty_host = HostConfig::default();
    let config = container.config.as_ref().unwrap_or(&empty_config);
    let host = container.host_config.as_ref().unwrap_or(&empty_host);

    let mut parts = vec!["docker".to_string(), "run".to_string()];

    if host.auto_remove.unwrap_or(false) {
        parts.push("--rm".to_string());
    }
    if config.open_stdin.unwrap_or(false) {
        parts.push("--interactive".to_string());
    }
    if config.tty.unwrap_or(false) {
        parts.push("--tty".to_string());
    }

    // Fully attached is the CLI default and needs no flag. Nothing attached
    // means the container was detached; a partial set gets one --attach per
    // stream.
    let attach_stdin = config.attach_stdin.unwrap_or(false);
    let attach_stdout = config.attach_stdout.unwrap_or(false);
    let attach_stderr = config.attach_stderr.unwrap_or(false);
    if !(attach_stdin && attach_stdout && attach_stderr) {
        if !attach_stdin && !attach_stdout && !attach_stderr {
            parts.push("--detach".to_string());
        } else {
            if attach_stdin {
                push_pair(&mut parts, "--attach", "stdin");
            }
            if attach_stdout {
                push_pair(&mut parts, "--attach", "stdout");
            }
            if attach_stderr {
                push_pair(&mut parts, "--attach", "stderr");
            }
        }
    }

    // The engine reports names with a leading slash.
    if let Some(name) = container.name.as_deref() {
        if !name.is_empty() {
            let base = Path::new(name)
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_else(|| name.to_string());
            push_pair(&mut parts, "--name", &base);
        }
    }

    // Auto-generated hostnames are a prefix of the container ID; only an
    // explicitly assigned hostname is worth reproducing.
    let id = container.id.as_deref().unwrap_or("");
    if let Some(hostname) = config.hostname.as_deref() {
        if !hostname.is_empty() && !id.starts_with(hostname) {
            push_pair(&mut parts, "--hostname", hostname);
        }
    }

    if let Some(mode) = host.network_mode.as_deref() {
        if !mode.is_empty() && mode != defaults::NETWORK_MODE_DEFAULT {
            push_pair(&mut parts, "--network", mode);
        }
    }

    for field in defaults::RESOURCE_FIELDS {
        if let Some(value) = (field.get)(host) {
            if value != field.unset {
                let rendered = match field.style {
                    NumberStyle::Bytes => human_size(value),
                    NumberStyle::Plain => value.to_string(),
                };
                push_pair(&mut parts, field.flag, &rendered);
            }
        }
    }

    push_string(&mut parts, "--cpuset-cpus", host.cpuset_cpus.as_deref());
    push_string(&mut parts, "--cpuset-mems", host.cpuset_mems.as_deref());

    if host.privileged.unwrap_or(false) {
        parts.push("--privileged".to_string());
    }
    if host.publish_all_ports.unwrap_or(false) {
        parts.push("--publish-all".to_string());
    }
    if host.readonly_rootfs.unwrap_or(false) {
        parts.push("--read-only".to_string());
    }

    push_string(&mut parts, "--mac-address", config.mac_address.as_deref());

    if let Some(entrypoint) = config.entrypoint.as_ref() {
        if !entrypoint.is_empty() {
            push_pair(&mut parts, "--entrypoint", &format!("'{}'", entrypoint.join(" ")));
        }
    }

    push_string(&mut parts, "--workdir", config.working_dir.as_deref());

    push_each(&mut parts, "--volume", host.binds.as_ref());
    push_string(&mut parts, "--volume-driver", host.volume_driver.as_deref());
    push_each(&mut parts, "--volumes-from", host.volumes_from.as_ref());

    push_each(&mut parts, "--cap-add", host.cap_add.as_ref());
    push_each(&mut parts, "--cap-drop", host.cap_drop.as_ref());
    push_each(&mut parts, "--group-add", host.group_add.as_ref());
    push_each(&mut parts, "--link", host.links.as_ref());

    push_each(&mut parts, "--dns", host.dns.as_ref());
    push_each(&mut parts, "--dns-opt", host.dns_options.as_ref());
    push_each(&mut parts, "--dns-search", host.dns_search.as_ref());

    push_string(&mut parts, "--cidfile", host.container_id_file.as_deref());

    if let Some(weight) = host.blkio_weight {
        if weight > 0 {
            push_pair(&mut parts, "--blkio-weight", &weight.to_string());
        }
    }

    for (key, value) in sorted_pairs(config.labels.as_ref()) {
        push_pair(&mut parts, "--label", &format!("{}={}", key, value));
    }

    for device in host.blkio_weight_device.iter().flatten() {
        if let Some(path) = device.path.as_deref() {
            if !path.is_empty() {
                let mut spec = path.to_string();
                if let Some(weight) = device.weight {
                    spec.push(':');
                    spec.push_str(&weight.to_string());
                }
                push_pair(&mut parts, "--blkio-weight-device", &spec);
            }
        }
    }

    push_each(&mut parts, "--add-host", host.extra_hosts.as_ref());
    push_string(&mut parts, "--cgroup-parent", host.cgroup_parent.as_deref());

    if let Some(policy) = host.restart_policy.as_ref() {
        match &policy.name {
            Some(RestartPolicyNameEnum::ON_FAILURE) => {
                let retries = policy.maximum_retry_count.unwrap_or(0);
                push_pair(&mut parts, "--restart", &format!("on-failure:{}", retries));
            }
            Some(RestartPolicyNameEnum::NO) | Some(RestartPolicyNameEnum::EMPTY) | None => {}
            Some(other) => push_pair(&mut parts, "--restart", &other.to_string()),
        }
    }

    if host.oom_kill_disable.unwrap_or(false) {
        parts.push("--oom-kill-disable".to_string());
    }
    if let Some(score) = host.oom_score_adj {
        if score != 0 {
            push_pair(&mut parts, "--oom-score-adj", &score.to_string());
        }
    }

    for limit in host.ulimits.iter().flatten() {
        let name = limit.name.as_deref().unwrap_or_default();
        let rendered = ulimit(name, limit.soft.unwrap_or(0), limit.hard.unwrap_or(0));
        push_pair(&mut parts, "--ulimit", &rendered);
    }

    for (mountpoint, options) in sorted_pairs(host.tmpfs.as_ref()) {
        if options.is_empty() {
            push_pair(&mut parts, "--tmpfs", mountpoint);
        } else {
            push_pair(&mut parts, "--tmpfs", &format!("{}:{}", mountpoint, options));
        }
    }

    push_string(&mut parts, "--userns", host.userns_mode.as_deref());
    push_string(&mut parts, "--uts", host.uts_mode.as_deref());
    push_string(&mut parts, "--user", config.user.as_deref());
    push_string(&mut parts, "--pid", host.pid_mode.as_deref());

    if let Some(limit) = host.pids_limit {
        if limit > 0 {
            push_pair(&mut parts, "--pids-limit", &limit.to_string());
        }
    }

    push_string(&mut parts, "--ipc", host.ipc_mode.as_deref());
    push_string(&mut parts, "--stop-signal", config.stop_signal.as_deref());

    for (key, value) in sorted_pairs(host.storage_opt.as_ref()) {
        push_pair(&mut parts, "--storage-opt", &format!("{}={}", key, value));
    }

    if let Some(size) = host.shm_size {
        if size != defaults::SHM_SIZE_DEFAULT {
            push_pair(&mut parts, "--shm-size", &human_size(size));
        }
    }

    for (key, value) in sorted_pairs(host.sysctls.as_ref()) {
        push_pair(&mut parts, "--sysctl", &format!("{}={}", key, value));
    }

    if let Some(log) = host.log_config.as_ref() {
        let driver = log.typ.as_deref().unwrap_or(defaults::LOG_DRIVER_DEFAULT);
        let opts = sorted_pairs(log.config.as_ref());
        if driver != defaults::LOG_DRIVER_DEFAULT || !opts.is_empty() {
            push_pair(&mut parts, "--log-driver", driver);
            for (key, value) in opts {
                push_pair(&mut parts, "--log-opt", &format!("{}={}", key, value));
            }
        }
    }

    push_each(&mut parts, "--security-opt", host.security_opt.as_ref());

    for device in host.devices.iter().flatten() {
        let mut spec = device.path_on_host.clone().unwrap_or_default();
        if let Some(inner) = device.path_in_container.as_deref() {
            if !inner.is_empty() {
                spec.push(':');
                spec.push_str(inner);
                if let Some(perms) = device.cgroup_permissions.as_deref() {
                    if !perms.is_empty() {
                        spec.push(':');
                        spec.push_str(perms);
                    }
                }
            }
        }
        push_pair(&mut parts, "--device", &spec);
    }

    push_throttle(&mut parts, "--device-read-bps", host.blkio_device_read_bps.as_ref());
    push_throttle(&mut parts, "--device-write-bps", host.blkio_device_write_bps.as_ref());
    push_throttle(&mut parts, "--device-read-iops", host.blkio_device_read_iops.as_ref());
    push_throttle(&mut parts, "--device-write-iops", host.blkio_device_write_iops.as_ref());

    // --publish-all already covers every exposed port.
    if !host.publish_all_ports.unwrap_or(false) {
        if let Some(bindings) = host.port_bindings.as_ref() {
            let mut ports: Vec<_> = bindings.iter().collect();
            ports.sort_by(|a, b| a.0.cmp(b.0));

            for (port_proto, host_bindings) in ports {
                let (port, proto) = match port_proto.split_once('/') {
                    Some((port, proto)) => (port, proto),
                    None => (port_proto.as_str(), "tcp"),
                };

                for binding in host_bindings.iter().flatten() {
                    let mut host_side = Vec::new();
                    if let Some(ip) = binding.host_ip.as_deref() {
                        if !ip.is_empty() {
                            host_side.push(ip.to_string());
                        }
                    }
                    if let Some(host_port) = binding.host_port.as_deref() {
                        if !host_port.is_empty() {
                            host_side.push(host_port.to_string());
                        }
                    }

                    let mut spec = host_side.join(":");
                    if !spec.is_empty() {
                        spec.push(':');
                    }
                    spec.push_str(port);
                    if proto != "tcp" {
                        spec.push('/');
                        spec.push_str(proto);
                    }
                    push_pair(&mut parts, "--publish", &spec);
                }
            }
        }
    }

    if let Some(image_ref) = config.image.as_deref() {
        if !image_ref.is_empty() {
            parts.push(image_ref.to_string());
        }
    }

    // All-or-nothing: the moment any argument is not part of the image's
    // default command, the whole container command is reproduced verbatim.
    let container_cmd = config.cmd.clone().unwrap_or_default();
    let image_cmd = image
        .config
        .as_ref()
        .and_then(|c| c.cmd.clone())
        .unwrap_or_default();
    let inherited = container_cmd.iter().all(|arg| image_cmd.contains(arg));
    if !inherited {
        parts.extend(container_cmd);
    }

    parts
}

// ======================================================
// TOKEN HELPERS
// ======================================================

fn push_pair(parts: &mut Vec<String>, flag: &str, value: &str) {
    parts.push(flag.to_string());
    parts.push(value.to_string());
}

fn push_string(parts: &mut Vec<String>, flag: &str, value: Option<&str>) {
    if let Some(value) = value {
        if !value.is_empty() {
            push_pair(parts, flag, value);
        }
    }
}

fn push_each(parts: &mut Vec<String>, flag: &str, values: Option<&Vec<String>>) {
    for value in values.into_iter().flatten() {
        push_pair(parts, flag, value);
    }
}

fn push_throttle(parts: &mut Vec<String>, flag: &str, devices: Option<&Vec<ThrottleDevice>>) {
    for device in devices.into_iter().flatten() {
        let mut spec = device.path.clone().unwrap_or_default();
        if let Some(rate) = device.rate {
            if rate > 0 {
                spec.push(':');
                spec.push_str(&rate.to_string());
            }
        }
        push_pair(parts, flag, &spec);
    }
}

fn sorted_pairs(map: Option<&HashMap<String, String>>) -> Vec<(&String, &String)> {
    let mut pairs: Vec<_> = map.into_iter().flatten().collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    pairs
}

// ======================================================
// TESTS
// ======================================================
