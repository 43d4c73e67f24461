//! Kubernetes manifests for the application workload

use super::{MANAGED_BY, RenderedArtifact, quoted};
use crate::config::DeploymentParams;
use crate::signature::{DATABASE_ENV_VARS, Framework, ProjectSignature};

/// Port the service and ingress listen on
pub const SERVICE_PORT: u16 = 80;

const HPA_CPU_UTILIZATION: u32 = 70;
const HPA_MEMORY_UTILIZATION: u32 = 80;

/// Variables the deployment sets literally
fn is_spring(framework: Framework) -> bool {
    matches!(framework, Framework::SpringBoot | Framework::Spring)
}

/// Variables the deployment always sets itself
fn is_builtin_env(name: &str, framework: Framework) -> bool {
    match name {
        "SERVER_PORT" | "APP_NAME" => true,
        "SPRING_PROFILES_ACTIVE" => is_spring(framework),
        _ => false,
    }
}

fn health_path(framework: Framework) -> &'static str {
    if framework == Framework::SpringBoot {
        "/actuator/health"
    } else {
        "/health"
    }
}

fn secret_name(params: &DeploymentParams) -> String {
    format!("{}-db-secret", params.project_name)
}

fn config_name(params: &DeploymentParams) -> String {
    format!("{}-config", params.project_name)
}

/// Shared metadata block, indented two spaces under `metadata:`
fn metadata(name: &str, params: &DeploymentParams) -> String {
    format!(
        "metadata:\n  name: {}\n  namespace: {}\n  labels:\n    app: {}\n    app.kubernetes.io/managed-by: {}\n",
        quoted(name),
        quoted(params.namespace()),
        quoted(&params.project_name),
        quoted(MANAGED_BY),
    )
}

/// Variables forwarded from the config map, database variables excluded
fn forwarded_env(signature: &ProjectSignature) -> impl Iterator<Item = &str> {
    signature
        .environment
        .iter()
        .map(String::as_str)
        .filter(move |name| !is_builtin_env(name, signature.framework))
        .filter(move |name| !(signature.database.required && DATABASE_ENV_VARS.contains(name)))
}

/// `k8s/namespace.yaml`
pub fn namespace(params: &DeploymentParams) -> String {
    format!(
        "apiVersion: v1\nkind: Namespace\nmetadata:\n  name: {}\n  labels:\n    app.kubernetes.io/managed-by: {}\n",
        quoted(params.namespace()),
        quoted(MANAGED_BY),
    )
}

fn env_block(signature: &ProjectSignature, params: &DeploymentParams) -> String {
    let mut out = String::from("          env:\n");
    out.push_str(&format!(
        "            - name: SERVER_PORT\n              value: {}\n            - name: APP_NAME\n              value: {}\n",
        quoted(&signature.primary_port().to_string()),
        quoted(&params.project_name),
    ));
    if is_spring(signature.framework) {
        out.push_str(&format!(
            "            - name: SPRING_PROFILES_ACTIVE\n              value: {}\n",
            quoted(&params.environment),
        ));
    }
    if signature.database.required {
        let secret = secret_name(params);
        for var in DATABASE_ENV_VARS {
            out.push_str(&format!(
                "            - name: {var}\n              valueFrom:\n                secretKeyRef:\n                  name: {}\n                  key: {var}\n",
                quoted(&secret),
            ));
        }
    }
    let config = config_name(params);
    for var in forwarded_env(signature).map(quoted) {
        out.push_str(&format!(
            "            - name: {var}\n              valueFrom:\n                configMapKeyRef:\n                  name: {}\n                  key: {var}\n                  optional: true\n",
            quoted(&config),
        ));
    }
    out
}

fn probe(kind: &str, path: &str, initial_delay: u32, period: u32) -> String {
    format!(
        "          {kind}:\n            httpGet:\n              path: {path}\n              port: http\n            initialDelaySeconds: {initial_delay}\n            periodSeconds: {period}\n"
    )
}

/// `k8s/deployment.yaml`
pub fn deployment(signature: &ProjectSignature, params: &DeploymentParams) -> String {
    let resources = &signature.resources;
    let path = health_path(signature.framework);
    let mut out = String::from("apiVersion: apps/v1\nkind: Deployment\n");
    out.push_str(&metadata(&params.project_name, params));
    out.push_str(&format!(
        "spec:\n  replicas: {replicas}\n  selector:\n    matchLabels:\n      app: {app}\n  template:\n    metadata:\n      labels:\n        app: {app}\n    spec:\n      containers:\n        - name: {app}\n          image: {image}\n          ports:\n            - name: http\n              containerPort: {port}\n              protocol: TCP\n          resources:\n            requests:\n              cpu: {cpu_request}\n              memory: {memory_request}\n            limits:\n              cpu: {cpu_limit}\n              memory: {memory_limit}\n",
        replicas = resources.replicas,
        app = quoted(&params.project_name),
        image = quoted(&params.image),
        port = signature.primary_port(),
        cpu_request = quoted(&resources.cpu_request),
        memory_request = quoted(&resources.memory_request),
        cpu_limit = quoted(&resources.cpu_limit),
        memory_limit = quoted(&resources.memory_limit),
    ));
    out.push_str(&env_block(signature, params));
    out.push_str(&probe("livenessProbe", path, 30, 10));
    out.push_str(&probe("readinessProbe", path, 5, 5));
    out
}

/// `k8s/service.yaml`
pub fn service(signature: &ProjectSignature, params: &DeploymentParams) -> String {
    let mut out = String::from("apiVersion: v1\nkind: Service\n");
    out.push_str(&metadata(&params.project_name, params));
    out.push_str(&format!(
        "spec:\n  type: ClusterIP\n  selector:\n    app: {}\n  ports:\n    - name: http\n      port: {SERVICE_PORT}\n      targetPort: {}\n      protocol: TCP\n",
        quoted(&params.project_name),
        signature.primary_port(),
    ));
    out
}

/// `k8s/ingress.yaml`
pub fn ingress(params: &DeploymentParams) -> String {
    let mut out = String::from("apiVersion: networking.k8s.io/v1\nkind: Ingress\n");
    out.push_str(&metadata(&params.project_name, params));
    out.push_str("  annotations:\n");
    out.push_str("    alb.ingress.kubernetes.io/scheme: internet-facing\n");
    out.push_str("    alb.ingress.kubernetes.io/target-type: ip\n");
    out.push_str("    alb.ingress.kubernetes.io/healthcheck-port: traffic-port\n");
    match params.certificate_arn.as_deref().filter(|arn| !arn.trim().is_empty()) {
        Some(arn) => {
            out.push_str(&format!("    alb.ingress.kubernetes.io/certificate-arn: {}\n", quoted(arn)));
            out.push_str("    alb.ingress.kubernetes.io/listen-ports: '[{\"HTTP\": 80}, {\"HTTPS\": 443}]'\n");
            out.push_str("    alb.ingress.kubernetes.io/ssl-redirect: '443'\n");
        }
        None => {
            out.push_str("    alb.ingress.kubernetes.io/listen-ports: '[{\"HTTP\": 80}]'\n");
        }
    }
    out.push_str(&format!(
        "spec:\n  ingressClassName: alb\n  rules:\n    - host: {}\n      http:\n        paths:\n          - path: /\n            pathType: Prefix\n            backend:\n              service:\n                name: {}\n                port:\n                  number: {SERVICE_PORT}\n",
        quoted(&params.domain),
        quoted(&params.project_name),
    ));
    out
}

/// `k8s/configmap.yaml`
pub fn configmap(signature: &ProjectSignature, params: &DeploymentParams) -> String {
    let mut out = String::from("apiVersion: v1\nkind: ConfigMap\n");
    out.push_str(&metadata(&config_name(params), params));
    out.push_str("data:\n");
    out.push_str(&format!("  APP_NAME: {}\n", quoted(&params.project_name)));
    out.push_str(&format!("  ENVIRONMENT: {}\n", quoted(&params.environment)));
    for var in forwarded_env(signature).filter(|var| !matches!(*var, "APP_NAME" | "ENVIRONMENT")) {
        out.push_str(&format!("  {}: \"\"\n", quoted(var)));
    }
    if signature.framework == Framework::SpringBoot {
        out.push_str("  application.properties: |\n");
        out.push_str(&format!("    server.port={}\n", signature.primary_port()));
        out.push_str(&format!("    spring.application.name={}\n", params.project_name));
        out.push_str("    management.endpoints.web.exposure.include=health,info\n");
        out.push_str("    management.endpoint.health.probes.enabled=true\n");
    }
    out
}

/// `k8s/secret.yaml`, placeholders to be replaced before applying
pub fn secret(signature: &ProjectSignature, params: &DeploymentParams) -> String {
    let kind = signature.database.effective_kind();
    let mut out = String::from("apiVersion: v1\nkind: Secret\n");
    out.push_str(&metadata(&secret_name(params), params));
    out.push_str("type: Opaque\nstringData:\n");
    out.push_str(&format!("  DB_HOST: {}\n", quoted("REPLACE_WITH_DATABASE_ENDPOINT")));
    out.push_str(&format!("  DB_PORT: {}\n", quoted(&kind.default_port().to_string())));
    out.push_str(&format!("  DB_NAME: {}\n", quoted(&params.project_name.replace('-', "_"))));
    out.push_str(&format!("  DB_USER: {}\n", quoted("app_admin")));
    out.push_str(&format!("  DB_PASSWORD: {}\n", quoted("REPLACE_WITH_DATABASE_PASSWORD")));
    out
}

/// `k8s/hpa.yaml`
pub fn hpa(signature: &ProjectSignature, params: &DeploymentParams) -> String {
    let replicas = signature.resources.replicas;
    let mut out = String::from("apiVersion: autoscaling/v2\nkind: HorizontalPodAutoscaler\n");
    out.push_str(&metadata(&params.project_name, params));
    out.push_str(&format!(
        "spec:\n  scaleTargetRef:\n    apiVersion: apps/v1\n    kind: Deployment\n    name: {}\n  minReplicas: {}\n  maxReplicas: {}\n  metrics:\n",
        quoted(&params.project_name),
        replicas,
        replicas.saturating_add(2),
    ));
    for (resource, utilization) in [("cpu", HPA_CPU_UTILIZATION), ("memory", HPA_MEMORY_UTILIZATION)] {
        out.push_str(&format!(
            "    - type: Resource\n      resource:\n        name: {resource}\n        target:\n          type: Utilization\n          averageUtilization: {utilization}\n"
        ));
    }
    out
}

/// Every Kubernetes manifest, in order; secret and autoscaler are conditional
pub fn render(signature: &ProjectSignature, params: &DeploymentParams) -> Vec<RenderedArtifact> {
    let mut artifacts = vec![
        RenderedArtifact::new("k8s/namespace.yaml", namespace(params)),
        RenderedArtifact::new("k8s/deployment.yaml", deployment(signature, params)),
        RenderedArtifact::new("k8s/service.yaml", service(signature, params)),
        RenderedArtifact::new("k8s/ingress.yaml", ingress(params)),
        RenderedArtifact::new("k8s/configmap.yaml", configmap(signature, params)),
    ];
    if signature.database.required {
        artifacts.push(RenderedArtifact::new("k8s/secret.yaml", secret(signature, params)));
    }
    if signature.needs_autoscaling() {
        artifacts.push(RenderedArtifact::new("k8s/hpa.yaml", hpa(signature, params)));
    }
    artifacts
}
